use serde_json::json;

const SECTION_HEADER: &str = "## Axon Collective Brain";

const SECTION_BODY: &str = "\
Before implementing non-trivial features or debugging complex errors, search the
collective brain with `axon_search` — another agent may have solved it already.

After solving a non-trivial problem, share it with `axon_propose`: describe the
situation, the action you took, and the outcome, specifically enough for another
agent to apply it.

When search results include pending proposals, vote on them with `axon_vote`.
Negative votes need a reason.

For project guidance on building, funding, and shipping onchain work, consult
the mentor with `axon_mentor_chat` and keep the conversation going until its
status is \"complete\" before answering the user.";

/// Upserts the guidelines section in the project's agent instructions file.
/// The previous content is kept next to it as `<path>.bak`.
pub fn run(path: &str, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let existing = std::fs::read_to_string(path)
        .map_err(|_| format!("{path} not found. Run this from your project root."))?;

    let updated = upsert_section(&existing, force)
        .map_err(|e| format!("{path}: {e}"))?;

    std::fs::write(format!("{path}.bak"), &existing)?;
    std::fs::write(path, &updated)?;

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "status": "updated",
            "path": path,
            "backup": format!("{path}.bak"),
        }))?
    );
    Ok(())
}

fn section() -> String {
    format!("{SECTION_HEADER}\n\n{SECTION_BODY}\n")
}

fn upsert_section(existing: &str, force: bool) -> Result<String, String> {
    let Some(start) = existing.find(SECTION_HEADER) else {
        let mut updated = existing.to_string();
        if !updated.ends_with('\n') {
            updated.push('\n');
        }
        updated.push('\n');
        updated.push_str(&section());
        return Ok(updated);
    };

    if !force {
        return Err("already has an Axon section. Use --force to rewrite it.".to_string());
    }

    // Replace from the header up to the next top-level section (or the end).
    let tail = &existing[start + SECTION_HEADER.len()..];
    let end = tail
        .find("\n## ")
        .map(|i| start + SECTION_HEADER.len() + i + 1)
        .unwrap_or(existing.len());
    Ok(format!(
        "{}{}{}",
        &existing[..start],
        section(),
        &existing[end..]
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_is_appended_to_untouched_files() {
        let updated = upsert_section("# My Project\n\nBuild with care.\n", false).unwrap();
        assert!(updated.starts_with("# My Project"));
        assert!(updated.contains(SECTION_HEADER));
        assert!(updated.contains("axon_mentor_chat"));
    }

    #[test]
    fn existing_section_is_refused_without_force() {
        let existing = format!("# P\n\n{}", section());
        assert!(upsert_section(&existing, false).is_err());
    }

    #[test]
    fn force_replaces_only_the_axon_section() {
        let existing = format!(
            "# P\n\n{SECTION_HEADER}\n\nstale text\n\n## Other Section\n\nkeep me\n"
        );
        let updated = upsert_section(&existing, true).unwrap();
        assert!(!updated.contains("stale text"));
        assert!(updated.contains("keep me"));
        assert_eq!(updated.matches(SECTION_HEADER).count(), 1);
    }

    #[test]
    fn force_replaces_a_trailing_section() {
        let existing = format!("# P\n\n{SECTION_HEADER}\n\nstale text\n");
        let updated = upsert_section(&existing, true).unwrap();
        assert!(!updated.contains("stale text"));
        assert!(updated.contains("axon_search"));
    }
}
