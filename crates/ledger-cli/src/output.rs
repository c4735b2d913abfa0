//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use ledger_core::analytics::{self, model::AnalyticsOverview};
use ledger_core::decision::model::{Decision, DecisionDetail, DecisionStatus};
use ledger_core::decision::DecisionAction;
use ledger_core::pagination::Pagination;
use ledger_core::search::model::SearchResult;
use ledger_core::workspace::model::{Channel, Workspace};
use unicode_width::UnicodeWidthStr;

/// Colored status label.
fn status_colored(status: DecisionStatus) -> ColoredString {
    match status {
        DecisionStatus::Pending => "pending".yellow(),
        DecisionStatus::Active => "active".green(),
        DecisionStatus::Ignored => "ignored".dimmed(),
        DecisionStatus::Expired => "expired".red(),
        DecisionStatus::Deleted => "deleted".red().dimmed(),
        DecisionStatus::Unknown => "unknown".normal(),
    }
}

/// Print a page of decisions as a table.
pub fn print_decisions_table(decisions: &[Decision], pagination: &Pagination, empty_message: &str) {
    if decisions.is_empty() {
        println!("{}", empty_message.dimmed());
        return;
    }

    let width = term_width();
    let title_width = width.saturating_sub(12 + 10 + 14 + 16 + 4).clamp(16, 60);

    println!(
        "{} {} {} {} {}",
        pad_right("ID", 12),
        pad_right("Title", title_width),
        pad_right("Status", 10),
        pad_right("Owner", 14),
        "Date"
    );
    println!("{}", "─".repeat((12 + title_width + 10 + 14 + 14).min(width)));

    for decision in decisions {
        let status = status_colored(decision.status);
        let status_pad = " ".repeat(10usize.saturating_sub(decision.status.as_str().len()));
        println!(
            "{} {} {}{} {} {}",
            pad_right(&truncate_visual(&decision.id, 12), 12).dimmed(),
            pad_right(&truncate_visual(&decision.title, title_width), title_width),
            status,
            status_pad,
            pad_right(&truncate_visual(decision.owner_label().unwrap_or("-"), 14), 14),
            decision
                .created_date()
                .map(|d| d.to_string())
                .unwrap_or_else(|| decision.created_at.clone())
                .dimmed()
        );
    }

    println!();
    println!(
        "{} decision(s) total {} {}",
        pagination.total.to_string().bold(),
        "·".dimmed(),
        pagination.label()
    );
}

/// Print a decision with its links.
pub fn print_decision(detail: &DecisionDetail) {
    let d = &detail.decision;
    println!("{} {}", d.title.cyan().bold(), format!("({})", d.id).dimmed());
    println!();

    if let Some(summary) = &d.summary {
        println!("{}", summary);
        println!();
    }

    println!("{}: {}", "Status".bold(), status_colored(d.status));
    if let Some(owner) = d.owner_label() {
        println!("{}: {}", "Owner".bold(), owner);
    }
    if let Some(category) = &d.category {
        println!("{}: {}", "Category".bold(), category);
    }
    if !d.tags().is_empty() {
        println!("{}: {}", "Tags".bold(), d.tags().join(", "));
    }
    if let Some(confidence) = d.confidence {
        println!("{}: {}%", "Confidence".bold(), (confidence * 100.0).round() as i64);
    }
    if let Some(channel) = &d.source_channel_name {
        println!("{}: #{}", "Channel".bold(), channel);
    }
    if let Some(url) = &d.source_url {
        println!("{}: {}", "Source".bold(), url.underline());
    }
    println!("{}: {}", "Created".bold(), d.created_at.dimmed());
    if let Some(at) = &d.confirmed_at {
        let by = d.confirmed_by.as_deref().unwrap_or("unknown");
        println!("{}: {} by {}", "Confirmed".bold(), at, by);
    }

    if let Some(rationale) = &d.rationale {
        println!();
        println!("{}", "Rationale".bold());
        println!("  {}", rationale);
    }

    if let Some(impact) = d.impact_area.as_ref().filter(|i| !i.is_empty()) {
        println!();
        println!("{}: {}", "Impact".bold(), impact.join(", "));
    }

    if !detail.links.is_empty() {
        println!();
        println!("{}", "Links".bold());
        for link in &detail.links {
            println!(
                "  {} {} {}",
                "●".cyan(),
                link.label(),
                format!("[{}]", link.link_type.as_deref().unwrap_or("link")).dimmed()
            );
        }
    }

    let actions = DecisionAction::allowed_for(d.status);
    if !actions.is_empty() {
        println!();
        let hints: Vec<String> = actions
            .iter()
            .map(|a| format!("ledger decisions {} {}", a.as_str(), d.id))
            .collect();
        println!("{}", hints.join("  |  ").dimmed());
    }
}

/// Print a search answer and its ranked decisions.
pub fn print_search_result(result: &SearchResult) {
    println!("{}", "Answer".bold());
    println!("{}", result.answer);
    println!();

    for decision in &result.decisions {
        println!(
            "  {} {} {}",
            format!("{:>3}%", decision.relevance_percent()).green(),
            decision.title.cyan(),
            format!("({})", decision.id).dimmed()
        );
        if let Some(summary) = &decision.summary {
            println!("       {}", truncate_visual(summary, term_width().saturating_sub(8)).dimmed());
        }
    }

    if !result.decisions.is_empty() {
        println!();
    }
    println!("{}", result.timing_line().dimmed());
}

/// Print the workspace profile.
pub fn print_workspace(ws: &Workspace) {
    println!("{} {}", ws.team_name.cyan().bold(), format!("({})", ws.slack_team_id).dimmed());
    println!();
    println!("{}: {}", "Plan".bold(), ws.plan.as_deref().unwrap_or("free"));
    println!(
        "{}: {}",
        "Onboarding".bold(),
        if ws.onboarding_complete { "complete".green() } else { "incomplete".yellow() }
    );
    println!("{}: {}", "Backfill".bold(), ws.backfill().label());
    println!(
        "{}: {}",
        "Jira".bold(),
        connection(ws.jira_domain.as_deref().filter(|_| ws.jira_connected()))
    );
    let github = ws
        .github_connected()
        .then(|| match ws.github_repo.as_deref() {
            Some(repo) => format!("{}/{}", ws.github_org.as_deref().unwrap_or_default(), repo),
            None => ws.github_org.clone().unwrap_or_default(),
        });
    println!("{}: {}", "GitHub".bold(), connection(github.as_deref()));
}

fn connection(target: Option<&str>) -> ColoredString {
    match target {
        Some(t) => format!("Connected ({})", t).green(),
        None => "Not connected".dimmed(),
    }
}

/// Print monitored channels.
pub fn print_channels(channels: &[Channel]) {
    if channels.is_empty() {
        println!("{}", "No channels monitored. Add one with 'ledger channels add <id>'.".dimmed());
        return;
    }

    println!("{}", "Monitored Channels".bold());
    println!();
    for channel in channels {
        let marker = if channel.enabled { "●".green() } else { "○".dimmed() };
        println!(
            "  {} {} {}",
            marker,
            pad_right(&channel.display_name(), 24),
            channel.channel_id.dimmed()
        );
    }
}

/// Print the analytics overview.
pub fn print_overview(overview: &AnalyticsOverview) {
    for stat in analytics::stats(overview) {
        println!("  {} {}", pad_right(stat.label, 20).bold(), stat.value.cyan());
    }

    println!();
    println!("{}", "Top Owners".bold());
    if overview.top_owners.is_empty() {
        println!("  {}", ledger_core::view::overview::NO_DATA.dimmed());
    }
    for owner in &overview.top_owners {
        println!("  {} {}", pad_right(owner.label(), 24), owner.count);
    }

    println!();
    println!("{}", "By Category".bold());
    let all = &overview.decisions_by_category;
    if all.is_empty() {
        println!("  {}", ledger_core::view::overview::NO_DATA.dimmed());
    }
    let bar_width = 30.0;
    for category in all {
        let percent = analytics::category_bar_percent(category, all);
        let filled = ((percent / 100.0) * bar_width).round() as usize;
        println!(
            "  {} {} {}",
            pad_right(category.label(), 16),
            "█".repeat(filled.max(1)).blue(),
            category.count
        );
    }
}

/// Print a success line.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_visual_respects_wide_chars() {
        assert_eq!(truncate_visual("short", 10), "short");
        assert_eq!(truncate_visual("abcdefghij", 6), "abcd..");
        assert_eq!(truncate_visual("決定決定決定", 6), "決定..");
    }

    #[test]
    fn test_pad_right() {
        assert_eq!(pad_right("ab", 4), "ab  ");
        assert_eq!(pad_right("abcdef", 4), "abcdef");
    }
}
