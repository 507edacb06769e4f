use super::{html::escape, icons};
use crate::{config::LanguageColors, github::responses::RepositorySummary};
use std::{
    cmp::Ordering,
    fmt::{self, Write},
};

/// Size of the top repositories grid.
pub const TOP_REPOSITORIES: usize = 4;

pub const NO_DESCRIPTION: &str = "No description available";

/// Most starred first, most recently pushed first among equals.
fn by_popularity(a: &RepositorySummary, b: &RepositorySummary) -> Ordering {
    b.stargazers_count.cmp(&a.stargazers_count).then_with(|| b.pushed_at.cmp(&a.pushed_at))
}

/// Picks the repositories for the grid, forks excluded.
pub fn rank_repositories(repos: &[RepositorySummary]) -> Vec<&RepositorySummary> {
    let mut ranked: Vec<_> = repos.iter().filter(|x| !x.fork).collect();
    ranked.sort_by(|a, b| by_popularity(a, b));
    ranked.truncate(TOP_REPOSITORIES);
    ranked
}

pub fn render_repository_card(
    repo: &RepositorySummary,
    colors: &LanguageColors,
) -> Result<String, fmt::Error> {
    let mut html = String::new();
    write_repository_card(&mut html, repo, colors)?;
    Ok(html)
}

fn write_repository_card(
    w: &mut impl Write,
    repo: &RepositorySummary,
    colors: &LanguageColors,
) -> fmt::Result {
    writeln!(w, r#"<a href="{}" target="_blank" class="repo-card">"#, escape(&repo.html_url))?;

    writeln!(w, r#"  <div class="repo-header">"#)?;
    writeln!(w, r#"    <div class="repo-icon">{}</div>"#, icons::FOLDER)?;
    writeln!(w, r#"    <span class="repo-name">{}</span>"#, escape(&repo.name))?;
    writeln!(w, r#"  </div>"#)?;

    let desc = repo.description.as_deref().filter(|x| !x.is_empty()).unwrap_or(NO_DESCRIPTION);
    writeln!(w, r#"  <p class="repo-desc">{}</p>"#, escape(desc))?;

    writeln!(w, r#"  <div class="repo-meta">"#)?;
    if let Some(lang) = repo.language.as_deref().filter(|x| !x.is_empty()) {
        writeln!(
            w,
            r#"    <span><span class="lang-dot" style="background: {}"></span>{}</span>"#,
            escape(colors.color_of(lang)),
            escape(lang)
        )?;
    }
    writeln!(w, r#"    <span>{}{}</span>"#, icons::STAR_SMALL, repo.stargazers_count)?;
    writeln!(w, r#"    <span>{}{}</span>"#, icons::fork_small(), repo.forks_count)?;
    writeln!(w, r#"  </div>"#)?;

    writeln!(w, "</a>")?;
    Ok(())
}

/// Markup for the top repositories grid.
pub fn render_top_repositories(
    repos: &[RepositorySummary],
    colors: &LanguageColors,
) -> Result<String, fmt::Error> {
    rank_repositories(repos).into_iter().map(|x| render_repository_card(x, colors)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;

    fn repo(name: &str, stars: u64, pushed_at: Option<DateTime<Utc>>) -> RepositorySummary {
        RepositorySummary {
            name: name.to_owned(),
            description: Some(format!("{name} description")),
            language: Some("Rust".to_owned()),
            stargazers_count: stars,
            forks_count: 0,
            html_url: format!("https://github.com/kafji/{name}"),
            fork: false,
            pushed_at,
        }
    }

    fn day(d: u32) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(2022, 7, d, 0, 0, 0).single()
    }

    #[test]
    fn test_rank_repositories() {
        let mut forked = repo("forked", 100, day(1));
        forked.fork = true;
        let repos = vec![
            repo("a", 1, day(1)),
            forked,
            repo("b", 5, day(1)),
            repo("c", 5, day(9)),
            repo("d", 0, day(20)),
            repo("e", 3, None),
            repo("f", 3, day(2)),
        ];

        let names: Vec<_> = rank_repositories(&repos).iter().map(|x| x.name.as_str()).collect();

        assert_eq!(names, ["c", "b", "f", "e"]);
    }

    #[test]
    fn test_rank_does_not_touch_input() {
        let repos = vec![repo("a", 1, day(1)), repo("b", 2, day(1))];
        let before = repos.clone();
        rank_repositories(&repos);
        assert_eq!(repos, before);
    }

    #[test]
    fn test_card() {
        let mut r = repo("shub", 12, day(1));
        r.forks_count = 3;
        let html = render_repository_card(&r, &LanguageColors::default()).unwrap();
        assert!(html.starts_with(r#"<a href="https://github.com/kafji/shub" target="_blank" class="repo-card">"#));
        assert!(html.contains(r#"<span class="repo-name">shub</span>"#));
        assert!(html.contains(r#"<p class="repo-desc">shub description</p>"#));
        assert!(html.contains(r#"<span class="lang-dot" style="background: #dea584"></span>Rust"#));
        assert!(html.contains("</svg>12</span>"));
        assert!(html.contains("</svg>3</span>"));
    }

    #[test]
    fn test_card_without_description_or_language() {
        let mut r = repo("shub", 0, None);
        r.description = None;
        r.language = None;
        let html = render_repository_card(&r, &LanguageColors::default()).unwrap();
        assert!(html.contains(r#"<p class="repo-desc">No description available</p>"#));
        assert!(!html.contains("lang-dot"));
    }

    #[test]
    fn test_card_with_unknown_language_uses_default_color() {
        let mut r = repo("shub", 0, None);
        r.language = Some("Zig".to_owned());
        let html = render_repository_card(&r, &LanguageColors::default()).unwrap();
        assert!(html.contains(r#"style="background: #8b949e"></span>Zig"#));
    }

    #[test]
    fn test_card_escapes_text() {
        let mut r = repo("shub", 0, None);
        r.description = Some("<script>alert(1)</script>".to_owned());
        let html = render_repository_card(&r, &LanguageColors::default()).unwrap();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_render_top_repositories() {
        let repos: Vec<_> = (0..10).map(|x| repo(&format!("r{x}"), x, day(1))).collect();
        let html = render_top_repositories(&repos, &LanguageColors::default()).unwrap();
        assert_eq!(html.matches(r#"class="repo-card""#).count(), 4);
        assert!(html.find("r9").unwrap() < html.find("r8").unwrap());
    }

    #[derive(Clone, Debug)]
    struct Repos(Vec<RepositorySummary>);

    impl Arbitrary for Repos {
        fn arbitrary(g: &mut Gen) -> Self {
            let size = usize::arbitrary(g) % 20;
            let repos = (0..size)
                .map(|i| {
                    let mut r = repo(
                        &format!("r{i}"),
                        u64::from(u8::arbitrary(g) % 8),
                        if bool::arbitrary(g) { day(u32::from(u8::arbitrary(g) % 28) + 1) } else { None },
                    );
                    r.fork = bool::arbitrary(g);
                    r
                })
                .collect();
            Repos(repos)
        }
    }

    #[quickcheck]
    fn prop_ranked_repositories_are_not_forks(Repos(repos): Repos) -> bool {
        rank_repositories(&repos).iter().all(|x| !x.fork)
    }

    #[quickcheck]
    fn prop_ranked_repositories_are_ordered(Repos(repos): Repos) -> bool {
        rank_repositories(&repos).windows(2).all(|x| {
            let (a, b) = (x[0], x[1]);
            a.stargazers_count > b.stargazers_count
                || (a.stargazers_count == b.stargazers_count && a.pushed_at >= b.pushed_at)
        })
    }

    #[quickcheck]
    fn prop_ranked_repositories_fit_the_grid(Repos(repos): Repos) -> bool {
        let ranked = rank_repositories(&repos);
        let candidates = repos.iter().filter(|x| !x.fork).count();
        ranked.len() == candidates.min(TOP_REPOSITORIES)
    }
}
