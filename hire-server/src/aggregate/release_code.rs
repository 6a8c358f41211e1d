//! Release code extraction from a confirm-hire response.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::DataError;
use crate::workflow::Fragment;

/// Caption of the node whose subtitle is the release code.
pub const RELEASE_CODE_CAPTION: &str = "Your cycle hire release code:";

/// Identifier suffix of the unlock banner.
pub const UNLOCK_SUFFIX: &str = "_unlockbar";

static BANNER_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Release code (\d+)").expect("valid release code pattern"));

/// Find the release code in a confirm-hire response.
///
/// The first captioned node carrying a subtitle wins. When that subtitle is
/// empty, the unlock banner text is the fallback; later captions are not
/// consulted.
pub fn extract_release_code(fragments: &[Fragment]) -> Result<String, DataError> {
    let captioned = fragments
        .iter()
        .find(|f| f.name.as_deref() == Some(RELEASE_CODE_CAPTION) && f.subtitle.is_some())
        .and_then(|f| f.subtitle.as_deref())
        .filter(|s| !s.is_empty());

    if let Some(code) = captioned {
        return Ok(code.to_string());
    }

    fragments
        .iter()
        .filter(|f| f.id().ends_with(UNLOCK_SUFFIX))
        .filter_map(|f| f.name.as_deref())
        .find_map(|name| BANNER_CODE.captures(name))
        .map(|caps| caps[1].to_string())
        .ok_or(DataError::CodeNotFound {
            fragments: fragments.len(),
        })
}
