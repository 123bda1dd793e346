//! Server-side HTML for the company dashboard.
//!
//! Every action re-renders the full page from a `DashboardView`. Controls
//! carry their target and arguments in data attributes; there are no inline
//! handler strings.

use std::fmt::Write;

use crate::models::application::{ApplicationStatus, StatusFilter};
use crate::models::ranking::RankedCandidates;
use crate::views::{badge_class, DashboardView, RowView};

/// Escapes text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn status_label(status: &ApplicationStatus) -> String {
    match status.as_str() {
        "" => "Unknown".to_string(),
        raw => capitalize(raw),
    }
}

fn disabled(busy: bool) -> &'static str {
    if busy {
        " disabled"
    } else {
        ""
    }
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let mut html = String::new();
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Applications</title></head>\n<body>\n");

    // Live regions come first so they exist before anything is announced.
    let _ = write!(
        html,
        "<div id=\"a11y-polite\" class=\"sr-only\" aria-live=\"polite\" aria-atomic=\"true\">{}</div>\n\
         <div id=\"a11y-assertive\" class=\"sr-only\" aria-live=\"assertive\" aria-atomic=\"true\">{}</div>\n",
        escape(&view.announcements.polite),
        escape(&view.announcements.assertive),
    );

    if let Some(n) = &view.notification {
        let level = serde_json::to_value(n.level)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let _ = writeln!(
            html,
            "<div class=\"toast toast-{level}\" role=\"status\">{}</div>",
            escape(&n.message)
        );
    }

    html.push_str("<nav class=\"status-tabs\" role=\"tablist\">\n");
    for tab in StatusFilter::ALL_TABS {
        let active = tab == view.filter;
        let _ = writeln!(
            html,
            "<button role=\"tab\" data-action=\"filter\" data-status=\"{}\" aria-selected=\"{}\"{}>{} <span class=\"count\">{}</span></button>",
            tab.as_str(),
            active,
            if active { " class=\"active\"" } else { "" },
            capitalize(tab.as_str()),
            view.counts.for_filter(tab),
        );
    }
    html.push_str("</nav>\n");

    let _ = write!(
        html,
        "<div class=\"bulk-bar\"><span class=\"selected-count\">{} selected</span>\
         <select id=\"bulk-status\">{}</select>\
         <input id=\"bulk-note\" type=\"text\" placeholder=\"Note (optional)\">\
         <button data-action=\"bulk-status\"{}>Update selected</button>\
         <button data-action=\"clear-selection\"{}>Clear</button></div>\n",
        view.selected_count,
        status_options(None),
        disabled(view.busy || view.selected_count == 0),
        disabled(view.selected_count == 0),
    );

    html.push_str("<table class=\"applications\">\n<thead><tr>");
    let _ = write!(
        html,
        "<th><input type=\"checkbox\" data-action=\"select-all\" aria-label=\"Select all visible applications\"{}></th>",
        if view.all_visible_selected { " checked" } else { "" }
    );
    html.push_str("<th>Candidate</th><th>Job</th><th>Applied</th><th>Match</th><th>Status</th><th>Change</th></tr></thead>\n<tbody>\n");

    if view.rows.is_empty() {
        html.push_str("<tr><td colspan=\"7\" class=\"empty\">No applications</td></tr>\n");
    }
    for row in &view.rows {
        render_row(&mut html, row, view.busy);
    }
    html.push_str("</tbody>\n</table>\n");

    if let Some(change) = &view.pending_change {
        let name = view
            .row(&change.id)
            .map(|r| r.candidate_name.as_str())
            .unwrap_or(change.id.as_str());
        let _ = write!(
            html,
            "<div class=\"modal\" role=\"dialog\" aria-modal=\"true\" aria-labelledby=\"confirm-title\">\
             <h2 id=\"confirm-title\">Move {} to {}?</h2>\
             <label for=\"confirm-note\">Note (optional)</label>\
             <textarea id=\"confirm-note\"></textarea>\
             <button data-action=\"confirm\" data-id=\"{}\"{}>Confirm</button>\
             <button data-action=\"cancel\">Cancel</button></div>\n",
            escape(name),
            escape(&status_label(&change.status)),
            escape(&change.id),
            disabled(view.busy),
        );
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_row(html: &mut String, row: &RowView, busy: bool) {
    let applied = row
        .applied_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(
        html,
        "<tr data-id=\"{id}\"><td><input type=\"checkbox\" data-action=\"toggle\" data-id=\"{id}\" aria-label=\"Select {name}\"{checked}></td>\
         <td>{name}<br><small>{email}</small></td><td>{job}<br><small>{company}</small></td>\
         <td>{applied}</td><td>{score}%</td>\
         <td><span class=\"badge {badge}\">{status}</span></td>\
         <td><select data-action=\"status\" data-id=\"{id}\"{busy}>{options}</select></td></tr>",
        id = escape(&row.id),
        name = escape(&row.candidate_name),
        email = escape(&row.candidate_email),
        job = escape(&row.job_title),
        company = escape(&row.company_name),
        applied = applied,
        score = row.match_score,
        badge = row.badge,
        status = escape(&status_label(&row.status)),
        checked = if row.selected { " checked" } else { "" },
        busy = disabled(busy),
        options = status_options(Some(&row.status)),
    );
}

fn status_options(current: Option<&ApplicationStatus>) -> String {
    let mut out = String::new();
    for status in ApplicationStatus::KNOWN.iter() {
        let _ = write!(
            out,
            "<option value=\"{}\"{}>{}</option>",
            status.as_str(),
            if current == Some(status) { " selected" } else { "" },
            status_label(status)
        );
    }
    out
}

pub fn render_ranked(ranked: &RankedCandidates) -> String {
    let mut html = String::new();
    let title = ranked
        .job_title
        .as_deref()
        .or(ranked.job_id.as_deref())
        .unwrap_or("Job");
    let _ = writeln!(html, "<h2>Ranked candidates: {}</h2>", escape(title));
    if let Some(total) = ranked.total_candidates {
        let _ = write!(html, "<p class=\"ranked-summary\">{total} candidates");
        if let (Some(experienced), Some(freshers)) = (ranked.experienced_count, ranked.fresher_count) {
            let _ = write!(html, " ({experienced} experienced, {freshers} freshers)");
        }
        html.push_str("</p>\n");
    }
    html.push_str("<ol class=\"ranked\">\n");
    for c in &ranked.candidates {
        let status = c
            .status
            .clone()
            .map(ApplicationStatus::from)
            .unwrap_or_default();
        let _ = write!(
            html,
            "<li data-id=\"{}\">{} <span class=\"score\">{:.0}</span> <span class=\"badge {}\">{}</span>",
            escape(&c.id),
            escape(&c.candidate_name),
            c.match_score.clamp(0.0, 100.0),
            badge_class(&status),
            escape(&status_label(&status)),
        );
        if let Some(rank) = c.rank {
            let _ = write!(html, " <span class=\"rank\">#{rank}</span>");
        }
        if let Some(percentile) = c.percentile {
            let _ = write!(html, " <span class=\"percentile\">{percentile:.0}th percentile</span>");
        }
        if c.is_fresher == Some(true) {
            html.push_str(" <span class=\"tag\">Fresher</span>");
        }
        if !c.score_breakdown.is_empty() {
            html.push_str("<dl class=\"breakdown\">");
            for (dimension, score) in &c.score_breakdown {
                let _ = write!(html, "<dt>{}</dt><dd>{score:.0}</dd>", escape(dimension));
            }
            html.push_str("</dl>");
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ol>\n");
    html
}
