use super::codec::Codec;
use super::executor::{FileSettings, convert_file_claiming};
use super::record::ConversionResult;
use std::collections::HashSet;

/// Converts every source in order, one at a time. The returned records line up
/// index for index with `sources`; a failed item never stops the rest.
///
/// Two items that resolve to the same output path do not overwrite each other:
/// the later one fails with an output collision.
pub fn convert_batch(
    codec: &dyn Codec,
    sources: &[String],
    settings: &FileSettings,
) -> Vec<ConversionResult> {
    let mut claimed = HashSet::new();
    let results: Vec<ConversionResult> = sources
        .iter()
        .map(|source| convert_file_claiming(codec, source, settings, Some(&mut claimed)))
        .collect();

    let failed = results.iter().filter(|result| !result.is_success()).count();
    tracing::info!(
        total = results.len(),
        failed,
        "batch conversion finished"
    );
    results
}
