// Results banner printed to stderr after detection

use rollcall_dedup::model::DedupSummary;

const RULE_WIDTH: usize = 70;

pub fn print_banner(summary: &DedupSummary) {
    eprintln!("{}", format_banner(summary));
}

fn format_banner(summary: &DedupSummary) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let lines = [
        String::new(),
        rule.clone(),
        format!("{:^width$}", "RESULTS", width = RULE_WIDTH),
        rule.clone(),
        format!("Rows read                          : {}", summary.total_rows),
        format!("Rows in a duplicate group          : {}", summary.flagged_rows),
        format!("Duplicate groups                   : {}", summary.groups),
        format!("   -> Repeated matricules          : {}", summary.id_duplicate_groups),
        format!(
            "   -> Students under several matricules ({}) : {}",
            summary.identity_mode, summary.multi_id_person_groups
        ),
        rule,
    ];
    lines.join("\n")
}
