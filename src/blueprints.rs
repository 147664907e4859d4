//! Static blueprint catalog.
//!
//! A read-only three-level lookup: experience level -> tech stack -> goal.
//! Built once at first use; `lookup` is total and falls back to the
//! beginner/frontend/portfolio entry for combinations not in the table.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::Blueprint;

/// Composite catalog key: `(level, stack, goal)`.
type CatalogKey = (&'static str, &'static str, &'static str);

/// Fallback entry for unknown combinations.
const DEFAULT_KEY: CatalogKey = ("beginner", "frontend", "portfolio");

static CATALOG: LazyLock<HashMap<CatalogKey, Blueprint>> = LazyLock::new(|| {
    let mut catalog = HashMap::new();

    catalog.insert(
        ("beginner", "frontend", "portfolio"),
        Blueprint {
            title: "Personal Portfolio Site",
            description: "A single-page portfolio with project cards, an about section, \
                          and a contact form. Deployed free on static hosting.",
            tech: &["HTML", "CSS", "JavaScript", "GitHub Pages"],
            milestones: &[
                "Sketch the layout and pick a color palette",
                "Build the hero and project sections",
                "Add the contact form and responsive styles",
                "Deploy and share the link",
            ],
            estimated_weeks: 2,
        },
    );

    catalog.insert(
        ("beginner", "frontend", "startup"),
        Blueprint {
            title: "Landing Page with Waitlist",
            description: "A product landing page that captures signups for an idea \
                          before a single line of product code exists.",
            tech: &["HTML", "CSS", "JavaScript", "Formspree"],
            milestones: &[
                "Write the value proposition and pick a template",
                "Build the page and wire up the signup form",
                "Add analytics and launch on social media",
            ],
            estimated_weeks: 1,
        },
    );

    catalog.insert(
        ("beginner", "backend", "learning"),
        Blueprint {
            title: "REST API from Scratch",
            description: "A small JSON API with CRUD routes and a file-backed store, \
                          built without frameworks to learn the fundamentals.",
            tech: &["Node.js", "Express", "SQLite"],
            milestones: &[
                "Model one resource and its routes",
                "Add persistence and input validation",
                "Write integration tests and a README",
            ],
            estimated_weeks: 3,
        },
    );

    catalog.insert(
        ("beginner", "fullstack", "portfolio"),
        Blueprint {
            title: "Recipe Box App",
            description: "A classic starter full-stack app: create, browse, and tag \
                          recipes, with a clean separation of API and UI.",
            tech: &["React", "Express", "SQLite"],
            milestones: &[
                "Design the recipe schema and API",
                "Build list and detail views",
                "Add search and tags",
                "Deploy both halves",
            ],
            estimated_weeks: 4,
        },
    );

    catalog.insert(
        ("intermediate", "frontend", "portfolio"),
        Blueprint {
            title: "Interactive Data Dashboard",
            description: "A dashboard over a public dataset with charts, filters, and \
                          shareable URLs. Shows off state management and data viz.",
            tech: &["React", "TypeScript", "D3", "Vite"],
            milestones: &[
                "Pick a dataset and define three key views",
                "Build the chart components",
                "Add URL-synced filters",
                "Polish loading and empty states",
            ],
            estimated_weeks: 4,
        },
    );

    catalog.insert(
        ("intermediate", "backend", "startup"),
        Blueprint {
            title: "SaaS Billing Service",
            description: "A multi-tenant API with auth, usage metering, and Stripe \
                          integration. The backbone of a paid product.",
            tech: &["Node.js", "PostgreSQL", "Redis", "Stripe"],
            milestones: &[
                "Model tenants, plans, and usage events",
                "Implement auth and rate limiting",
                "Integrate checkout and webhooks",
                "Add a usage report endpoint",
            ],
            estimated_weeks: 6,
        },
    );

    catalog.insert(
        ("intermediate", "fullstack", "startup"),
        Blueprint {
            title: "Micro-SaaS MVP",
            description: "A complete minimal product: marketing page, signup, one core \
                          workflow, and payments. Scoped to ship in weeks.",
            tech: &["Next.js", "PostgreSQL", "Prisma", "Stripe"],
            milestones: &[
                "Cut scope to one core workflow",
                "Build auth and the workflow end to end",
                "Wire up payments and a free tier",
                "Launch to a small beta list",
            ],
            estimated_weeks: 6,
        },
    );

    catalog.insert(
        ("advanced", "backend", "learning"),
        Blueprint {
            title: "Distributed Task Queue",
            description: "A worker queue with visibility timeouts, retries, and a \
                          dead-letter channel. A deep dive into reliability patterns.",
            tech: &["Go", "Redis", "Docker", "Prometheus"],
            milestones: &[
                "Define the job lifecycle and wire format",
                "Implement enqueue, lease, and ack",
                "Add retries with backoff and a DLQ",
                "Load-test and chart the metrics",
            ],
            estimated_weeks: 8,
        },
    );

    catalog.insert(
        ("advanced", "fullstack", "startup"),
        Blueprint {
            title: "Realtime Collaboration Tool",
            description: "A shared workspace with live cursors and conflict-free edits. \
                          Hard enough to impress, scoped enough to finish.",
            tech: &["TypeScript", "WebSockets", "CRDTs", "PostgreSQL"],
            milestones: &[
                "Prototype the sync protocol on one document type",
                "Build presence and live cursors",
                "Persist and replay edit history",
                "Harden reconnects and offline edits",
            ],
            estimated_weeks: 10,
        },
    );

    catalog
});

/// Look up the blueprint for a `(level, stack, goal)` combination.
///
/// Total: unknown combinations get the default entry, never an error.
pub fn lookup(level: &str, stack: &str, goal: &str) -> &'static Blueprint {
    CATALOG
        .iter()
        .find_map(|(&(l, s, g), bp)| (l == level && s == stack && g == goal).then_some(bp))
        .unwrap_or_else(|| &CATALOG[&DEFAULT_KEY])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_returns_entry() {
        let bp = lookup("advanced", "backend", "learning");
        assert_eq!(bp.title, "Distributed Task Queue");

        let bp = lookup("intermediate", "fullstack", "startup");
        assert_eq!(bp.title, "Micro-SaaS MVP");
    }

    #[test]
    fn absent_combination_falls_back_to_default() {
        let default = lookup("beginner", "frontend", "portfolio");
        assert_eq!(lookup("advanced", "frontend", "portfolio").title, default.title);
        assert_eq!(lookup("", "", "").title, default.title);
        assert_eq!(lookup("wizard", "cobol", "moonshot").title, default.title);
    }

    #[test]
    fn every_entry_has_content() {
        for key in [
            ("beginner", "frontend", "portfolio"),
            ("beginner", "backend", "learning"),
            ("advanced", "backend", "learning"),
        ] {
            let bp = lookup(key.0, key.1, key.2);
            assert!(!bp.title.is_empty());
            assert!(!bp.milestones.is_empty());
            assert!(bp.estimated_weeks > 0);
        }
    }
}
