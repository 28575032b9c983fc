use chevscout_core::{
    AlternativeEntry, CourseEntry, MatchReport, ProfileAnalysis, StatementBullets, TrioEntry,
};
use ratatui::text::{Line, Span};

use crate::theme::Theme;

pub const MBA_FEE_ADVISORY: &str =
    "Chevening funds MBA fees up to \u{a3}22,000; plan to cover the rest yourself.";
pub const TRIO_DIVERSIFY_ADVISORY: &str =
    "All trio picks are at one university. Consider spreading your trio across universities.";
pub const VERIFY_FEE_LABEL: &str = "\u{26a0} Verify on university site";

/// One rendered top-level report section: a typed fragment, not a string.
/// The main view flattens these into the output paragraph in order.
pub struct SectionBlock {
    pub title: &'static str,
    pub lines: Vec<Line<'static>>,
}

/// Maps a parsed report to presentational fragments in fixed order:
/// profile, trio, ranked courses, statement bullets, alternatives, notes.
/// Absent sections produce no block at all. Every nested field is treated
/// as possibly missing; the model's output is never trusted to be complete.
pub fn build_report_sections(
    report: &MatchReport,
    theme: &Theme,
    show_score_details: bool,
) -> Vec<SectionBlock> {
    let mut sections = Vec::new();

    if let Some(block) = report.profile.as_ref().and_then(|p| profile_section(p, theme)) {
        sections.push(block);
    }
    if let Some(block) = report
        .chevening_trio
        .as_ref()
        .and_then(|t| trio_section(t, theme))
    {
        sections.push(block);
    }
    if let Some(block) = report
        .ranked_courses
        .as_ref()
        .and_then(|c| courses_section(c, theme, show_score_details))
    {
        sections.push(block);
    }
    if let Some(block) = report
        .personal_statement_bullets
        .as_ref()
        .and_then(|b| statement_section(b, theme))
    {
        sections.push(block);
    }
    if let Some(block) = report
        .alternatives
        .as_ref()
        .and_then(|a| alternatives_section(a, theme))
    {
        sections.push(block);
    }
    if let Some(block) = report.notes.as_ref().and_then(|n| notes_section(n, theme)) {
        sections.push(block);
    }

    sections
}

fn profile_section(profile: &ProfileAnalysis, theme: &Theme) -> Option<SectionBlock> {
    if profile.strengths.is_empty() && profile.gaps.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    if !profile.strengths.is_empty() {
        lines.push(Line::from(Span::styled(
            "Strengths".to_string(),
            theme.entry_title_style,
        )));
        for item in &profile.strengths {
            lines.push(bullet(item, theme));
        }
    }
    if !profile.gaps.is_empty() {
        lines.push(Line::from(Span::styled(
            "Gaps to address".to_string(),
            theme.entry_title_style,
        )));
        for item in &profile.gaps {
            lines.push(bullet(item, theme));
        }
    }

    Some(SectionBlock {
        title: "PROFILE ANALYSIS",
        lines,
    })
}

fn trio_section(trio: &[TrioEntry], theme: &Theme) -> Option<SectionBlock> {
    if trio.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    if single_university_trio(trio) {
        lines.push(Line::from(Span::styled(
            TRIO_DIVERSIFY_ADVISORY.to_string(),
            theme.advisory_style,
        )));
    }

    for (idx, entry) in trio.iter().enumerate() {
        let programme = entry.programme.as_deref().unwrap_or("(programme unknown)");
        let university = entry.university.as_deref().unwrap_or("(university unknown)");
        lines.push(Line::from(vec![
            Span::styled(format!("{}. ", idx + 1), theme.entry_detail_style),
            Span::styled(programme.to_string(), theme.entry_title_style),
            Span::styled(format!("  {}", university), theme.entry_detail_style),
        ]));
        if let Some(why) = entry.why_this_trio.as_deref() {
            lines.push(indented(why, theme));
        }
    }

    Some(SectionBlock {
        title: "CHEVENING TRIO",
        lines,
    })
}

fn courses_section(
    courses: &[CourseEntry],
    theme: &Theme,
    show_score_details: bool,
) -> Option<SectionBlock> {
    if courses.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    for course in courses {
        lines.extend(course_lines(course, theme, show_score_details));
        lines.push(Line::from(""));
    }
    lines.pop();

    Some(SectionBlock {
        title: "RANKED COURSES",
        lines,
    })
}

fn course_lines(course: &CourseEntry, theme: &Theme, show_score_details: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let rank = course
        .rank
        .map(|r| format!("#{} ", r))
        .unwrap_or_default();
    let programme = course.programme.as_deref().unwrap_or("(programme unknown)");
    let university = course.university.as_deref().unwrap_or("(university unknown)");
    lines.push(Line::from(vec![
        Span::styled(rank, theme.section_title_style),
        Span::styled(programme.to_string(), theme.entry_title_style),
        Span::styled(format!("  {}", university), theme.entry_detail_style),
    ]));

    let mut detail_parts = Vec::new();
    if let Some(city) = course.city.as_deref() {
        detail_parts.push(city.to_string());
    }
    if let Some(cycle) = course.start_cycle.as_deref() {
        detail_parts.push(cycle.to_string());
    }
    if let Some(months) = course.duration_months {
        detail_parts.push(format!("{} months", months));
    }
    if !detail_parts.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("   {}", detail_parts.join(" | ")),
            theme.entry_detail_style,
        )));
    }

    if let Some(fee) = course.fee_gbp.as_deref() {
        lines.push(fee_line(fee, theme));
    }

    if let Some(check) = &course.eligibility_check {
        if check.is_eligible {
            lines.push(Line::from(Span::styled(
                "   [ELIGIBLE]".to_string(),
                theme.badge_eligible_style,
            )));
        } else {
            let mut spans = vec![Span::styled(
                "   [NOT ELIGIBLE]".to_string(),
                theme.badge_ineligible_style,
            )];
            if let Some(reason) = check.reason.as_deref() {
                spans.push(Span::styled(
                    format!(" {}", reason),
                    theme.error_style,
                ));
            }
            lines.push(Line::from(spans));
        }
    }

    if is_mba(programme) {
        lines.push(Line::from(Span::styled(
            format!("   {}", MBA_FEE_ADVISORY),
            theme.advisory_style,
        )));
    }

    for item in &course.rationale {
        lines.push(bullet(item, theme));
    }

    if let Some(url) = course.url.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("   {}", url),
            theme.entry_detail_style,
        )));
    }

    if let Some(explanation) = course.score_explanation.as_deref() {
        if show_score_details {
            lines.push(Line::from(Span::styled(
                format!("   \u{25be} {}", explanation),
                theme.disclosure_style,
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "   \u{25b8} Score explanation (Ctrl+E to expand)".to_string(),
                theme.disclosure_style,
            )));
        }
    }

    lines
}

fn fee_line(fee: &str, theme: &Theme) -> Line<'static> {
    if is_verify_fee(fee) {
        Line::from(Span::styled(
            format!("   Fee: {}", VERIFY_FEE_LABEL),
            theme.verify_fee_style,
        ))
    } else {
        Line::from(Span::styled(
            format!("   Fee: \u{a3}{}", fee.trim_start_matches('\u{a3}')),
            theme.entry_detail_style,
        ))
    }
}

fn statement_section(bullets: &StatementBullets, theme: &Theme) -> Option<SectionBlock> {
    if bullets.leadership.is_empty() && bullets.networking.is_empty() && bullets.career_plan.is_empty()
    {
        return None;
    }

    let mut lines = Vec::new();
    for (heading, items) in [
        ("Leadership", &bullets.leadership),
        ("Networking", &bullets.networking),
        ("Career plan", &bullets.career_plan),
    ] {
        if items.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(
            heading.to_string(),
            theme.entry_title_style,
        )));
        for item in items {
            lines.push(bullet(item, theme));
        }
    }

    Some(SectionBlock {
        title: "PERSONAL STATEMENT BULLETS",
        lines,
    })
}

fn alternatives_section(alternatives: &[AlternativeEntry], theme: &Theme) -> Option<SectionBlock> {
    if alternatives.is_empty() {
        return None;
    }

    let mut lines = Vec::new();
    for entry in alternatives {
        let programme = entry.programme.as_deref().unwrap_or("(programme unknown)");
        let university = entry.university.as_deref().unwrap_or("(university unknown)");
        lines.push(Line::from(vec![
            Span::styled(programme.to_string(), theme.entry_title_style),
            Span::styled(format!("  {}", university), theme.entry_detail_style),
        ]));
        if let Some(why) = entry.why_consider.as_deref() {
            lines.push(indented(why, theme));
        }
        if let Some(url) = entry.url.as_deref() {
            lines.push(Line::from(Span::styled(
                format!("   {}", url),
                theme.entry_detail_style,
            )));
        }
    }

    Some(SectionBlock {
        title: "ALTERNATIVES",
        lines,
    })
}

fn notes_section(notes: &[String], theme: &Theme) -> Option<SectionBlock> {
    if notes.is_empty() {
        return None;
    }

    let lines = notes.iter().map(|note| bullet(note, theme)).collect();
    Some(SectionBlock {
        title: "NOTES",
        lines,
    })
}

fn bullet(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!("   \u{2022} {}", text),
        theme.entry_detail_style,
    ))
}

fn indented(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!("   {}", text),
        theme.entry_detail_style,
    ))
}

fn is_mba(programme: &str) -> bool {
    programme.to_lowercase().contains("mba")
}

fn is_verify_fee(fee: &str) -> bool {
    fee.to_lowercase().contains("verify")
}

fn single_university_trio(trio: &[TrioEntry]) -> bool {
    if trio.len() < 2 {
        return false;
    }
    let mut universities = trio.iter().map(|t| t.university.as_deref());
    let Some(first) = universities.next() else {
        return false;
    };
    first.is_some() && universities.all(|u| u == first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chevscout_core::{parse_report, EligibilityCheck};

    fn theme() -> Theme {
        Theme::dark()
    }

    fn flat(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn full_report() -> MatchReport {
        parse_report(
            r#"{
                "profile": { "strengths": ["s1", "s2"], "gaps": ["g1"] },
                "rankedCourses": [
                    { "rank": 1, "university": "Leeds", "programme": "MSc Data Science" },
                    { "rank": 2, "university": "Bath", "programme": "MSc Economics" }
                ],
                "cheveningTrio": [
                    { "university": "Leeds", "programme": "A" },
                    { "university": "Bath", "programme": "B" },
                    { "university": "York", "programme": "C" }
                ],
                "personalStatementBullets": {
                    "leadership": ["l1"], "networking": ["n1"], "careerPlan": ["c1", "c2"]
                },
                "alternatives": [ { "university": "Kent", "programme": "MSc CS" } ],
                "notes": ["note 1", "note 2", "note 3"]
            }"#,
        )
        .unwrap()
    }

    fn trio(universities: &[&str]) -> Vec<TrioEntry> {
        universities
            .iter()
            .map(|u| TrioEntry {
                university: Some(u.to_string()),
                programme: Some("MSc".to_string()),
                why_this_trio: None,
            })
            .collect()
    }

    #[test]
    fn full_report_renders_six_sections_in_fixed_order() {
        let sections = build_report_sections(&full_report(), &theme(), false);
        let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            vec![
                "PROFILE ANALYSIS",
                "CHEVENING TRIO",
                "RANKED COURSES",
                "PERSONAL STATEMENT BULLETS",
                "ALTERNATIVES",
                "NOTES"
            ]
        );
    }

    #[test]
    fn entry_counts_match_the_report() {
        let sections = build_report_sections(&full_report(), &theme(), false);

        let profile = flat(&sections[0].lines);
        assert_eq!(profile.matches("\u{2022}").count(), 3);

        let trio = flat(&sections[1].lines);
        assert!(trio.contains("1. "));
        assert!(trio.contains("3. "));

        let courses = flat(&sections[2].lines);
        assert_eq!(courses.matches('#').count(), 2);

        let bullets = flat(&sections[3].lines);
        assert_eq!(bullets.matches("\u{2022}").count(), 4);

        let notes = flat(&sections[5].lines);
        assert_eq!(notes.matches("\u{2022}").count(), 3);
    }

    #[test]
    fn missing_sections_are_omitted_entirely() {
        let report = parse_report(r#"{ "notes": ["only notes"] }"#).unwrap();
        let sections = build_report_sections(&report, &theme(), false);
        let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["NOTES"]);
    }

    #[test]
    fn empty_lists_render_no_heading() {
        let report = parse_report(
            r#"{ "rankedCourses": [], "notes": [], "profile": { "strengths": [], "gaps": [] } }"#,
        )
        .unwrap();
        assert!(build_report_sections(&report, &theme(), false).is_empty());
    }

    #[test]
    fn mba_programmes_carry_the_fee_cap_advisory() {
        let mut course = CourseEntry::default();
        course.programme = Some("Full-time MBA".to_string());
        let text = flat(&course_lines(&course, &theme(), false));
        assert!(text.contains(MBA_FEE_ADVISORY));

        course.programme = Some("mba (Executive)".to_string());
        let text = flat(&course_lines(&course, &theme(), false));
        assert!(text.contains(MBA_FEE_ADVISORY));

        course.programme = Some("MSc Business Analytics".to_string());
        let text = flat(&course_lines(&course, &theme(), false));
        assert!(!text.contains(MBA_FEE_ADVISORY));
    }

    #[test]
    fn verify_sentinel_fee_renders_the_indicator_not_a_price() {
        let mut course = CourseEntry::default();
        course.fee_gbp = Some("Verify on university site".to_string());
        let text = flat(&course_lines(&course, &theme(), false));
        assert!(text.contains(VERIFY_FEE_LABEL));
        assert!(!text.contains("\u{a3}Verify"));

        course.fee_gbp = Some("24,500".to_string());
        let text = flat(&course_lines(&course, &theme(), false));
        assert!(text.contains("Fee: \u{a3}24,500"));
        assert!(!text.contains(VERIFY_FEE_LABEL));
    }

    #[test]
    fn single_university_trio_gets_the_advisory_exactly_once() {
        let block = trio_section(&trio(&["Leeds", "Leeds", "Leeds"]), &theme()).unwrap();
        let text = flat(&block.lines);
        assert_eq!(text.matches(TRIO_DIVERSIFY_ADVISORY).count(), 1);
    }

    #[test]
    fn mixed_university_trio_has_no_advisory() {
        let block = trio_section(&trio(&["Leeds", "Bath", "Leeds"]), &theme()).unwrap();
        assert!(!flat(&block.lines).contains(TRIO_DIVERSIFY_ADVISORY));

        // A single entry never triggers it either.
        let block = trio_section(&trio(&["Leeds"]), &theme()).unwrap();
        assert!(!flat(&block.lines).contains(TRIO_DIVERSIFY_ADVISORY));
    }

    #[test]
    fn ineligible_badge_carries_the_reason_verbatim() {
        let mut course = CourseEntry::default();
        course.eligibility_check = Some(EligibilityCheck {
            is_eligible: false,
            reason: Some("Part-time delivery only".to_string()),
        });
        let text = flat(&course_lines(&course, &theme(), false));
        assert!(text.contains("[NOT ELIGIBLE]"));
        assert!(text.contains("Part-time delivery only"));
        assert!(!text.contains("[ELIGIBLE]"));
    }

    #[test]
    fn eligible_badge_has_no_reason_text() {
        let mut course = CourseEntry::default();
        course.eligibility_check = Some(EligibilityCheck {
            is_eligible: true,
            reason: Some("meets every rule".to_string()),
        });
        let text = flat(&course_lines(&course, &theme(), false));
        assert!(text.contains("[ELIGIBLE]"));
        assert!(!text.contains("[NOT ELIGIBLE]"));
        assert!(!text.contains("meets every rule"));
    }

    #[test]
    fn score_explanation_is_collapsed_until_expanded() {
        let mut course = CourseEntry::default();
        course.score_explanation = Some("40% weight dominated by CV fit".to_string());

        let collapsed = flat(&course_lines(&course, &theme(), false));
        assert!(collapsed.contains("Score explanation"));
        assert!(!collapsed.contains("40% weight dominated by CV fit"));

        let expanded = flat(&course_lines(&course, &theme(), true));
        assert!(expanded.contains("40% weight dominated by CV fit"));
    }

    #[test]
    fn course_without_optional_fields_still_renders() {
        let course = CourseEntry::default();
        let text = flat(&course_lines(&course, &theme(), false));
        assert!(text.contains("(programme unknown)"));
        assert!(text.contains("(university unknown)"));
        assert!(!text.contains("Fee:"));
        assert!(!text.contains("ELIGIBLE"));
    }
}
