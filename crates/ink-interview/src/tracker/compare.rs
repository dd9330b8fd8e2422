//! Side-by-side view of a chapter's two latest drafts.

use crate::artifact::Draft;

/// Render two drafts as a two-column markdown table, one line per row.
pub fn side_by_side(before: &Draft, after: &Draft) -> String {
    let left: Vec<&str> = before.text.lines().collect();
    let right: Vec<&str> = after.text.lines().collect();
    let rows = left.len().max(right.len());

    let mut out = format!("| {} | {} |\n|---|---|\n", before.name, after.name);
    for i in 0..rows {
        let l = left.get(i).copied().unwrap_or("");
        let r = right.get(i).copied().unwrap_or("");
        let marker = if l == r { "" } else { " *" };
        out.push_str(&format!("| {} | {}{marker} |\n", cell(l), cell(r)));
    }
    out
}

fn cell(text: &str) -> String {
    text.trim().replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, text: &str) -> Draft {
        Draft {
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn marks_changed_rows() {
        let out = side_by_side(
            &draft("01.md", "She left.\nThe door shut."),
            &draft("02.md", "She fled.\nThe door shut.\nSilence."),
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "| 01.md | 02.md |");
        assert_eq!(lines[2], "| She left. | She fled. * |");
        assert_eq!(lines[3], "| The door shut. | The door shut. |");
        assert_eq!(lines[4], "|  | Silence. * |");
    }
}
