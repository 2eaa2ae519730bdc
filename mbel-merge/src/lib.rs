//! MBEL Merge - Delta Aggregation
//!
//! Pure text computation for folding delta snippets into memory-bank files:
//! insertion points for `[SECTION]`-addressed deltas, substring-based
//! duplicate detection, `@task{ID}` conflict detection across snippets, and
//! priority ordering of sections. No file I/O happens here; callers read
//! and write files and hand in the contents.
//!
//! Duplicate detection is deliberately coarse: a delta is a duplicate iff
//! its trimmed text occurs verbatim in the target. A principled diff-merge
//! is out of scope.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static TASK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@task\{([^}]*)\}[^\n]*").unwrap());
static SECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\[([^\]]+)\]\s*$").unwrap());

/// Where a delta lands in a target file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionPoint {
    /// Section the delta belongs to, when it names one.
    pub section: Option<String>,
    /// 1-based line at which the delta is inserted.
    pub line: usize,
    /// The target has no such section yet; the delta appends it.
    pub is_new_section: bool,
    /// Byte offset of the insertion.
    pub offset: usize,
}

/// One delta folded into a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOutcome {
    pub merged: String,
    pub insertion: InsertionPoint,
    pub duplicate: bool,
}

/// Conflicting `@task{ID}` lines across delta snippets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConflict {
    pub id: String,
    /// Every distinct full text seen for this id, in first-seen order.
    pub texts: Vec<String>,
}

/// A group of deltas addressed to one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionGroup {
    pub section: String,
    pub priority: u32,
    pub deltas: Vec<String>,
}

/// The aggregate view over a batch of delta snippets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Section groups in priority order.
    pub sections: Vec<SectionGroup>,
    pub conflicts: Vec<TaskConflict>,
}

/// Merge priority of a section name. Lower merges earlier.
pub fn section_priority(name: &str) -> u32 {
    match name {
        "FOCUS" => 1,
        "STATUS" => 2,
        "PROGRESS" => 3,
        "PENDING" => 4,
        _ => 100,
    }
}

/// The `[SECTION]` heading a delta opens with, if any.
pub fn delta_section(delta: &str) -> Option<String> {
    let first = delta.trim_start().lines().next()?;
    SECTION_RE
        .captures(first)
        .map(|c| c[1].to_string())
}

/// A delta is a duplicate iff its trimmed text occurs verbatim in the
/// target.
pub fn is_duplicate(content: &str, delta: &str) -> bool {
    let trimmed = delta.trim();
    !trimmed.is_empty() && content.contains(trimmed)
}

/// Find where a delta belongs in `content`: the end of its `[SECTION]`
/// when the target already has that section, otherwise the end of file as
/// a new section.
pub fn find_insertion_point(content: &str, delta: &str) -> InsertionPoint {
    let section = delta_section(delta);
    let lines: Vec<&str> = content.lines().collect();

    if let Some(section_name) = &section {
        if let Some(heading) = lines
            .iter()
            .position(|l| SECTION_RE.captures(l).is_some_and(|c| &c[1] == section_name))
        {
            // insertion goes before the next section heading, trailing
            // blank lines excluded
            let mut end = lines.len();
            for (i, line) in lines.iter().enumerate().skip(heading + 1) {
                if SECTION_RE.is_match(line) {
                    end = i;
                    break;
                }
            }
            while end > heading + 1 && lines[end - 1].trim().is_empty() {
                end -= 1;
            }
            return InsertionPoint {
                section,
                line: end + 1,
                is_new_section: false,
                offset: offset_of_line(content, end),
            };
        }
    }

    InsertionPoint {
        section,
        line: lines.len() + 1,
        is_new_section: true,
        offset: content.len(),
    }
}

/// Fold one delta into the target, returning the merged text. Duplicates
/// leave the target unchanged.
pub fn merge_delta(content: &str, delta: &str) -> MergeOutcome {
    let insertion = find_insertion_point(content, delta);
    if is_duplicate(content, delta) {
        return MergeOutcome {
            merged: content.to_string(),
            insertion,
            duplicate: true,
        };
    }

    // For an existing section, drop the delta's own heading line.
    let body = if insertion.is_new_section {
        delta.trim().to_string()
    } else {
        let trimmed = delta.trim();
        match delta_section(delta) {
            Some(_) => trimmed
                .lines()
                .skip(1)
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string(),
            None => trimmed.to_string(),
        }
    };

    let mut merged = String::with_capacity(content.len() + body.len() + 2);
    merged.push_str(&content[..insertion.offset]);
    if !merged.is_empty() && !merged.ends_with('\n') {
        merged.push('\n');
    }
    if insertion.is_new_section && !merged.is_empty() && !merged.ends_with("\n\n") {
        merged.push('\n');
    }
    merged.push_str(&body);
    merged.push('\n');
    merged.push_str(&content[insertion.offset..]);
    MergeOutcome {
        merged,
        insertion,
        duplicate: false,
    }
}

/// Group deltas by section in priority order and surface `@task{ID}`
/// conflicts: any id whose full matched text differs between snippets.
pub fn aggregate(deltas: &[&str]) -> AggregateReport {
    let mut groups: Vec<SectionGroup> = Vec::new();
    let mut task_texts: HashMap<String, Vec<String>> = HashMap::new();
    let mut task_order: Vec<String> = Vec::new();

    for delta in deltas {
        let section = delta_section(delta).unwrap_or_else(|| "OTHER".to_string());
        match groups.iter_mut().find(|g| g.section == section) {
            Some(group) => group.deltas.push(delta.to_string()),
            None => groups.push(SectionGroup {
                priority: section_priority(&section),
                section,
                deltas: vec![delta.to_string()],
            }),
        }

        for capture in TASK_RE.captures_iter(delta) {
            let id = capture[1].to_string();
            let text = capture[0].to_string();
            let texts = task_texts.entry(id.clone()).or_insert_with(|| {
                task_order.push(id.clone());
                Vec::new()
            });
            if !texts.contains(&text) {
                texts.push(text);
            }
        }
    }

    groups.sort_by_key(|g| g.priority);

    let conflicts = task_order
        .into_iter()
        .filter_map(|id| {
            let texts = task_texts.remove(&id)?;
            (texts.len() > 1).then_some(TaskConflict { id, texts })
        })
        .collect();

    AggregateReport {
        sections: groups,
        conflicts,
    }
}

/// Byte offset of the start of 0-based `line`, or the end of the content.
fn offset_of_line(content: &str, line: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let mut remaining = line;
    for (i, b) in content.bytes().enumerate() {
        if b == b'\n' {
            remaining -= 1;
            if remaining == 0 {
                return i + 1;
            }
        }
    }
    content.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = "\
[FOCUS]
@active::Work

[STATUS]
@task{T1}::open

[NOTES]
misc
";

    #[test]
    fn insertion_into_existing_section() {
        let point = find_insertion_point(TARGET, "[STATUS]\n@task{T2}::open");
        assert_eq!(point.section.as_deref(), Some("STATUS"));
        assert!(!point.is_new_section);
        // after the last non-empty line of [STATUS]
        assert_eq!(point.line, 6);
        assert_eq!(&TARGET[..point.offset], "[FOCUS]\n@active::Work\n\n[STATUS]\n@task{T1}::open\n");
    }

    #[test]
    fn insertion_of_new_section_is_end_of_file() {
        let point = find_insertion_point(TARGET, "[PENDING]\n@task{T9}::open");
        assert!(point.is_new_section);
        assert_eq!(point.offset, TARGET.len());
    }

    #[test]
    fn duplicate_detection_is_substring_based() {
        assert!(is_duplicate(TARGET, "@task{T1}::open"));
        assert!(is_duplicate(TARGET, "  @task{T1}::open\n"));
        assert!(!is_duplicate(TARGET, "@task{T2}::open"));
        assert!(!is_duplicate(TARGET, "   "));
    }

    #[test]
    fn merge_appends_into_the_right_section() {
        let outcome = merge_delta(TARGET, "[STATUS]\n@task{T2}::open");
        assert!(!outcome.duplicate);
        let status_index = outcome.merged.find("@task{T2}::open").unwrap();
        let notes_index = outcome.merged.find("[NOTES]").unwrap();
        assert!(status_index < notes_index, "{}", outcome.merged);
        // existing content is preserved
        assert!(outcome.merged.contains("@task{T1}::open"));
    }

    #[test]
    fn merge_of_duplicate_leaves_target_unchanged() {
        let outcome = merge_delta(TARGET, "@task{T1}::open");
        assert!(outcome.duplicate);
        assert_eq!(outcome.merged, TARGET);
    }

    #[test]
    fn merge_of_new_section_appends_heading_and_body() {
        let outcome = merge_delta(TARGET, "[PENDING]\n@task{T9}::open");
        assert!(outcome.insertion.is_new_section);
        assert!(outcome.merged.ends_with("[PENDING]\n@task{T9}::open\n"));
    }

    #[test]
    fn sections_aggregate_in_priority_order() {
        let report = aggregate(&[
            "[NOTES]\nx",
            "[PENDING]\n@task{P}::open",
            "[FOCUS]\n@active::Now",
            "[STATUS]\ns",
        ]);
        let names: Vec<&str> = report.sections.iter().map(|g| g.section.as_str()).collect();
        assert_eq!(names, vec!["FOCUS", "STATUS", "PENDING", "NOTES"]);
        assert_eq!(report.sections[0].priority, 1);
        assert_eq!(report.sections[3].priority, 100);
    }

    #[test]
    fn conflicting_task_texts_are_flagged() {
        let report = aggregate(&[
            "[STATUS]\n@task{T1}::open",
            "[STATUS]\n@task{T1}::closed",
            "[STATUS]\n@task{T2}::open",
            "[PROGRESS]\n@task{T2}::open",
        ]);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].id, "T1");
        assert_eq!(report.conflicts[0].texts.len(), 2);
    }

    #[test]
    fn section_priorities() {
        assert!(section_priority("FOCUS") < section_priority("STATUS"));
        assert!(section_priority("STATUS") < section_priority("PROGRESS"));
        assert!(section_priority("PROGRESS") < section_priority("PENDING"));
        assert!(section_priority("PENDING") < section_priority("ANYTHING"));
    }
}
