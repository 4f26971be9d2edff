//! Formatted terminal output.
//!
//! All text layout lives here so output changes stay in one place.

use crate::domain::{ModelFamily, SigmaRange, Sigmas};
use crate::schedules::ScheduleDescriptor;

/// One row per schedule: id, label, kind, default rho, aliases.
pub fn format_schedule_list<'a, I>(descriptors: I) -> String
where
    I: IntoIterator<Item = &'a ScheduleDescriptor>,
{
    let mut out = String::new();
    push_row(
        &mut out,
        format!("{:<26} {:<24} {:<9} {:>5} {}", "id", "label", "kind", "rho", "aliases"),
    );
    push_row(
        &mut out,
        format!("{:-<26} {:-<24} {:-<9} {:-<5} {:-<7}", "", "", "", "", ""),
    );

    for d in descriptors {
        let rho = d.default_rho.map(|r| format!("{r:.1}")).unwrap_or_default();
        push_row(
            &mut out,
            format!(
                "{:<26} {:<24} {:<9} {:>5} {}",
                d.id,
                truncate(d.label, 24),
                d.generator.kind_name(),
                rho,
                d.aliases.join(", "),
            ),
        );
    }

    out
}

/// Header line plus one `step sigma` row per entry.
pub fn format_schedule_table(
    descriptor: &ScheduleDescriptor,
    range: &SigmaRange,
    family: ModelFamily,
    sigmas: &Sigmas,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== {} ({}) ===\n",
        descriptor.label, descriptor.id
    ));
    out.push_str(&format!(
        "Range: sigma=[{:.4}, {:.4}] | family={} | entries={}\n\n",
        range.min(),
        range.max(),
        family.display_name(),
        sigmas.len(),
    ));

    push_row(&mut out, format!("{:>5} {:>14}", "step", "sigma"));
    push_row(&mut out, format!("{:->5} {:->14}", "", ""));
    for (step, sigma) in sigmas.iter().enumerate() {
        push_row(&mut out, format!("{step:>5} {sigma:>14.6}"));
    }

    out
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
