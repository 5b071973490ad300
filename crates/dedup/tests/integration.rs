use rollcall_dedup::config::{DedupConfig, FuzzyConfig, IdentityMode, MergeStrategy};
use rollcall_dedup::engine::run;
use rollcall_dedup::model::{DuplicateCause, LabeledRecord, RawRecord};

fn row(id: &str, nom: &str, prenom: &str) -> RawRecord {
    RawRecord::new(id, nom, prenom, "M")
}

fn fuzzy_config() -> DedupConfig {
    DedupConfig {
        identity_mode: IdentityMode::Fuzzy,
        ..DedupConfig::default()
    }
}

fn at(rows: &[LabeledRecord], position: usize) -> &LabeledRecord {
    rows.iter()
        .find(|r| r.position == position)
        .unwrap_or_else(|| panic!("no row at position {position}"))
}

// -------------------------------------------------------------------------
// End-to-end
// -------------------------------------------------------------------------

#[test]
fn repeated_matricule_pair() {
    let input = vec![
        RawRecord::new("A1", "Dupont", "Jean", "M"),
        RawRecord::new("A1", "DUPONT", "JEAN", "M"),
        RawRecord::new("B2", "Martin", "Luc", "M"),
    ];
    let result = run(&DedupConfig::default(), input).unwrap();

    assert_eq!(result.summary.total_rows, 3);
    assert_eq!(result.summary.groups, 1);
    assert_eq!(result.summary.flagged_rows, 2);
    assert_eq!(result.summary.id_duplicate_groups, 1);
    assert_eq!(result.summary.multi_id_person_groups, 0);

    let labels: Vec<(String, String)> = result
        .rows
        .iter()
        .map(|r| (r.group_label(), r.cause_label()))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("G1".to_string(), "MATRICULE DUPLIQUÉ".to_string()),
            ("G1".to_string(), "MATRICULE DUPLIQUÉ".to_string()),
            (String::new(), String::new()),
        ]
    );
    assert_eq!(result.rows[2].record.raw.nom.as_deref(), Some("Martin"));
}

#[test]
fn cancelled_matricules_join_their_original() {
    let input = vec![
        row("A100", "KOUAME", "AMA"),
        row("a100 ", "TRAORE", "ISSA"),
        row("A100-ANNULE-X", "DIALLO", "FANTA"),
        row("B200", "SOW", "AWA"),
    ];
    let result = run(&DedupConfig::default(), input).unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].positions, vec![0, 1, 2]);
    for pos in 0..3 {
        let r = at(&result.rows, pos);
        assert_eq!(r.record.cleaned_id, "A100");
        assert_eq!(r.group, Some(1));
        assert!(r.causes.contains(&DuplicateCause::IdDuplicated));
    }
    assert_eq!(at(&result.rows, 3).group, None);
}

#[test]
fn same_person_two_matricules_exact_mode() {
    let input = vec![row("A1", "DUPONT", "JEAN"), row("A2", "Dupont", "jean")];
    let result = run(&DedupConfig::default(), input).unwrap();

    assert_eq!(result.summary.multi_id_person_groups, 1);
    assert_eq!(result.summary.id_duplicate_groups, 0);
    for r in &result.rows {
        assert_eq!(r.group_label(), "G1");
        assert_eq!(r.cause_label(), "ÉTUDIANT MULTI-MATRICULE");
    }
}

#[test]
fn same_person_same_matricule_is_id_duplicate_only() {
    let input = vec![row("A1", "DUPONT", "JEAN"), row("A1", "Dupont", "jean")];
    let result = run(&DedupConfig::default(), input).unwrap();

    assert_eq!(result.summary.multi_id_person_groups, 0);
    for r in &result.rows {
        assert_eq!(r.cause_label(), "MATRICULE DUPLIQUÉ");
    }
}

#[test]
fn both_signals_merge_into_one_group() {
    // 0 and 1 share a matricule; 1 and 2 are the same student under two
    // matricules. The two candidate groups overlap on 1.
    let input = vec![
        row("A1", "KONE", "AWA"),
        row("A1", "TOURE", "MOUSSA"),
        row("B9", "Touré", "Moussa"),
        row("C3", "BAMBA", "ALI"),
    ];
    for strategy in [MergeStrategy::UnionFind, MergeStrategy::FirstMatch] {
        let config = DedupConfig {
            merge_strategy: strategy,
            ..DedupConfig::default()
        };
        let result = run(&config, input.clone()).unwrap();

        assert_eq!(result.groups.len(), 1, "{strategy}");
        assert_eq!(result.groups[0].positions, vec![0, 1, 2], "{strategy}");
        assert_eq!(at(&result.rows, 0).cause_label(), "MATRICULE DUPLIQUÉ");
        assert_eq!(
            at(&result.rows, 1).cause_label(),
            "MATRICULE DUPLIQUÉ; ÉTUDIANT MULTI-MATRICULE"
        );
        assert_eq!(at(&result.rows, 2).cause_label(), "ÉTUDIANT MULTI-MATRICULE");
        assert_eq!(at(&result.rows, 3).group, None);
    }
}

#[test]
fn bridging_student_joins_two_matricule_groups() {
    // A1 pair and B2 pair are linked by the same student listed under both.
    let input = vec![
        row("A1", "DIALLO", "FANTA"),
        row("A1", "SOW", "AWA"),
        row("B2", "KEITA", "SEYDOU"),
        row("B2", "SOW", "AWA"),
    ];

    let joined = run(&DedupConfig::default(), input.clone()).unwrap();
    assert_eq!(joined.groups.len(), 1);
    assert_eq!(joined.groups[0].positions, vec![0, 1, 2, 3]);

    let config = DedupConfig {
        merge_strategy: MergeStrategy::FirstMatch,
        ..DedupConfig::default()
    };
    let first_match = run(&config, input).unwrap();
    assert_eq!(first_match.groups.len(), 2);
    assert_eq!(first_match.groups[0].positions, vec![0, 1, 3]);
    assert_eq!(first_match.groups[1].positions, vec![2, 3]);
    // Each row still carries exactly one group label.
    assert_eq!(at(&first_match.rows, 3).group, Some(1));
    assert_eq!(first_match.summary.flagged_rows, 4);
}

#[test]
fn fuzzy_mode_catches_spelling_variant() {
    let input = vec![
        row("A1", "KOUASSI", "STEVE"),
        row("A2", "Kouassi", "Steeve"),
        row("B1", "SMITH", "X"),
        row("B2", "JONES", "X"),
    ];

    let exact = run(&DedupConfig::default(), input.clone()).unwrap();
    assert_eq!(exact.summary.groups, 0);

    let fuzzy = run(&fuzzy_config(), input).unwrap();
    assert_eq!(fuzzy.summary.groups, 1);
    assert_eq!(fuzzy.groups[0].positions, vec![0, 1]);
    assert_eq!(at(&fuzzy.rows, 0).cause_label(), "ÉTUDIANT MULTI-MATRICULE");
    assert_eq!(at(&fuzzy.rows, 2).group, None);
    assert_eq!(at(&fuzzy.rows, 3).group, None);
}

#[test]
fn fuzzy_window_suppresses_distant_pair() {
    let mut input = vec![row("A1", "MARTIN", "LUC")];
    // Eleven unrelated names sorting between MARTIN and MARTINE.
    let fillers = ["ZOE", "KOFI", "YAO", "BEN", "GIL", "HAWA", "IBO", "RUTH", "SEKOU", "PIA", "WU"];
    for (i, prenom) in fillers.iter().enumerate() {
        let nom = format!("MARTINA{}", char::from(b'A' + i as u8));
        input.push(row(&format!("F{i}"), &nom, prenom));
    }
    input.push(row("A2", "MARTINE", "LUC"));

    let narrow = DedupConfig {
        identity_mode: IdentityMode::Fuzzy,
        fuzzy: FuzzyConfig {
            threshold: 0.85,
            window: 10,
        },
        ..DedupConfig::default()
    };
    let result = run(&narrow, input.clone()).unwrap();
    assert_eq!(at(&result.rows, 0).group, None);
    assert_eq!(at(&result.rows, 12).group, None);

    let wide = run(&fuzzy_config(), input).unwrap();
    let g = at(&wide.rows, 0).group.expect("MARTIN grouped with a wide window");
    assert_eq!(at(&wide.rows, 12).group, Some(g));
}

#[test]
fn blank_matricules_are_configurable() {
    let mut a = row("", "A", "A");
    a.matricule = None;
    let input = vec![a, row(" ", "B", "B"), row("C1", "C", "C")];

    let grouped = run(&DedupConfig::default(), input.clone()).unwrap();
    assert_eq!(grouped.summary.groups, 1);
    assert_eq!(grouped.groups[0].positions, vec![0, 1]);

    let config = DedupConfig {
        group_blank_ids: false,
        ..DedupConfig::default()
    };
    let ungrouped = run(&config, input).unwrap();
    assert_eq!(ungrouped.summary.groups, 0);
}

#[test]
fn all_missing_rows_group_as_blank_ids() {
    let input = vec![
        row("A1", "Dupont", "Jean"),
        RawRecord::default(),
        row("B2", "Martin", "Luc"),
        RawRecord::default(),
    ];

    let result = run(&DedupConfig::default(), input.clone()).unwrap();
    assert_eq!(result.summary.total_rows, 4);
    assert_eq!(result.summary.groups, 1);
    assert_eq!(result.groups[0].positions, vec![1, 3]);
    assert!(at(&result.rows, 3).causes.contains(&DuplicateCause::IdDuplicated));

    let config = DedupConfig {
        group_blank_ids: false,
        ..DedupConfig::default()
    };
    let result = run(&config, input).unwrap();
    assert_eq!(result.summary.groups, 0);
    assert_eq!(result.rows.len(), 4);
}

#[test]
fn huge_fuzzy_window_scans_every_row() {
    let mut config = fuzzy_config();
    config.fuzzy.window = usize::MAX;
    let input = vec![
        row("C7", "Koffi", "Steve"),
        row("B2", "Martin", "Luc"),
        row("C8", "Koffi", "Steeve"),
    ];

    let result = run(&config, input).unwrap();
    assert_eq!(result.summary.multi_id_person_groups, 1);
    assert_eq!(result.groups[0].positions, vec![0, 2]);
}

#[test]
fn invalid_config_rejected_by_run() {
    let mut config = DedupConfig::default();
    config.fuzzy.window = 0;
    let err = run(&config, vec![row("A1", "X", "Y")]).unwrap_err();
    assert!(err.to_string().contains("fuzzy.window"));
}

#[test]
fn empty_input() {
    let result = run(&fuzzy_config(), Vec::new()).unwrap();
    assert_eq!(result.summary.total_rows, 0);
    assert!(result.rows.is_empty());
    assert!(result.groups.is_empty());
}

#[test]
fn source_values_are_never_rewritten() {
    let input = vec![row(" a1-annule ", " Éloïse ", "marie "), row("A1", "ELOISE", "MARIE")];
    let result = run(&DedupConfig::default(), input.clone()).unwrap();
    let first = at(&result.rows, 0);
    assert_eq!(first.record.raw, input[0]);
    assert_eq!(first.record.cleaned_id, "A1");
    assert_eq!(first.record.identity_key, "ELOISE | MARIE");
}

#[test]
fn report_serializes_without_rows() {
    let result = run(&DedupConfig::default(), vec![row("A1", "X", "Y"), row("A1", "X", "Y")]).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("rows").is_none());
    assert_eq!(json["summary"]["groups"], 1);
    assert_eq!(json["meta"]["identity_mode"], "exact");
    assert_eq!(json["meta"]["merge_strategy"], "union_find");
    assert_eq!(json["meta"]["fuzzy"]["window"], 50);
    assert_eq!(json["groups"][0]["label"], "G1");
    assert_eq!(json["groups"][0]["causes"][0], "id_duplicated");
}
