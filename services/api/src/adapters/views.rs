//! services/api/src/adapters/views.rs
//!
//! HTML implementation of the `DashboardRenderer` port. The page layout lives in
//! `after-login-home.html` in the views directory; this module only fills in the
//! `{{user_name}}`, `{{user_email}}`, `{{doubts}}` and `{{bookasessions}}` slots.

use doubtnlearn_core::domain::{BookedSession, DashboardView, Doubt};
use doubtnlearn_core::ports::DashboardRenderer;
use std::fmt::Write;
use std::path::Path;

pub const DASHBOARD_TEMPLATE: &str = "after-login-home.html";

pub struct HtmlDashboardRenderer {
    template: String,
}

impl HtmlDashboardRenderer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Reads the dashboard template from a views directory.
    pub async fn from_views_dir(views_dir: &Path) -> std::io::Result<Self> {
        let template = tokio::fs::read_to_string(views_dir.join(DASHBOARD_TEMPLATE)).await?;
        Ok(Self::new(template))
    }
}

impl DashboardRenderer for HtmlDashboardRenderer {
    fn render_dashboard(&self, view: &DashboardView) -> String {
        fill_slots(&self.template, |slot| match slot {
            "user_name" => Some(escape_html(&view.user.name)),
            "user_email" => Some(escape_html(&view.user.email)),
            "doubts" => Some(render_doubts(&view.doubts)),
            "bookasessions" => Some(render_booked_sessions(&view.bookasessions)),
            _ => None,
        })
    }
}

/// Replaces each `{{slot}}` in the template in a single pass. Inserted text is
/// never scanned again, and unknown slots are left as written.
fn fill_slots(template: &str, mut slot: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let filled = after
            .find("}}")
            .and_then(|end| slot(&after[..end]).map(|value| (end, value)));
        match filled {
            Some((end, value)) => {
                out.push_str(&value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn render_doubts(doubts: &[Doubt]) -> String {
    if doubts.is_empty() {
        return "<p class=\"empty\">No doubts submitted yet.</p>".to_string();
    }

    let mut html = String::from("<ul class=\"doubts\">");
    for doubt in doubts {
        let _ = write!(
            html,
            "<li><p>{}</p><time datetime=\"{}\">{}</time>",
            escape_html(&doubt.doubt_text),
            doubt.created_at.to_rfc3339(),
            doubt.created_at.format("%Y-%m-%d %H:%M"),
        );
        if let Some(path) = &doubt.image_path {
            let _ = write!(
                html,
                "<img src=\"/{}\" alt=\"Attached image\">",
                escape_html(path)
            );
        }
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}

fn render_booked_sessions(sessions: &[BookedSession]) -> String {
    if sessions.is_empty() {
        return "<p class=\"empty\">No sessions booked yet.</p>".to_string();
    }

    let mut html = String::from("<ul class=\"bookasessions\">");
    for session in sessions {
        let _ = write!(
            html,
            "<li><h3>{}</h3><time datetime=\"{}\">{}</time><p>{}</p><p>{} &middot; {} &middot; {}</p></li>",
            escape_html(&session.subject),
            session.preferred_time.to_rfc3339(),
            session.preferred_time.format("%Y-%m-%d %H:%M UTC"),
            escape_html(&session.message),
            escape_html(&session.name),
            escape_html(&session.email),
            escape_html(&session.phone),
        );
    }
    html.push_str("</ul>");
    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use doubtnlearn_core::domain::DashboardUser;
    use uuid::Uuid;

    fn view() -> DashboardView {
        let user_id = Uuid::new_v4();
        DashboardView {
            user: DashboardUser {
                name: "Asha <script>".to_string(),
                email: "a@x.com".to_string(),
            },
            doubts: vec![Doubt {
                id: Uuid::new_v4(),
                user_id,
                doubt_text: "why & how?".to_string(),
                image_path: Some("uploads/1700000000000.png".to_string()),
                created_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap(),
            }],
            bookasessions: vec![],
        }
    }

    #[test]
    fn slots_are_filled_and_escaped() {
        let renderer = HtmlDashboardRenderer::new(
            "<h1>{{user_name}}</h1><p>{{user_email}}</p>{{doubts}}{{bookasessions}}",
        );
        let html = renderer.render_dashboard(&view());

        assert!(html.contains("<h1>Asha &lt;script&gt;</h1>"));
        assert!(html.contains("<p>a@x.com</p>"));
        assert!(html.contains("why &amp; how?"));
        assert!(html.contains("<img src=\"/uploads/1700000000000.png\""));
        assert!(html.contains("No sessions booked yet."));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn slot_markers_in_user_text_stay_literal() {
        let renderer = HtmlDashboardRenderer::new("<h1>{{user_name}}</h1>{{doubts}}{{bookasessions}}");
        let mut view = view();
        view.user.name = "{{user_email}}".to_string();
        view.doubts[0].doubt_text = "literal {{bookasessions}} text".to_string();

        let html = renderer.render_dashboard(&view);
        assert!(html.contains("<h1>{{user_email}}</h1>"));
        assert!(html.contains("<p>literal {{bookasessions}} text</p>"));
        assert_eq!(html.matches("No sessions booked yet.").count(), 1);
        assert!(!html.contains("a@x.com"));
    }

    #[test]
    fn unknown_slots_are_left_as_written() {
        let renderer = HtmlDashboardRenderer::new("{{nope}} {{user_name}} {{");
        let html = renderer.render_dashboard(&view());
        assert_eq!(html, "{{nope}} Asha &lt;script&gt; {{");
    }

    #[test]
    fn escape_covers_attribute_breakers() {
        assert_eq!(escape_html("\"'<>&"), "&quot;&#x27;&lt;&gt;&amp;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
