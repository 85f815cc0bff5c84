//! System prompt assembly.

use ragturn_config::SUMMARIES_PLACEHOLDER;
use ragturn_core::context::ContextRecord;

/// Substitute the retrieved context into `template`.
///
/// Record texts are joined with `"\n"` and replace every `{summaries}`
/// occurrence. A template without the placeholder is returned unchanged.
pub fn assemble(template: &str, records: &[ContextRecord]) -> String {
    let summaries = records
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    template.replace(SUMMARIES_PLACEHOLDER, &summaries)
}
