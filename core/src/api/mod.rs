//! Operation namespaces.
//!
//! Each namespace is a borrowed view over the client's `Requester`. An
//! operation validates its arguments into a `Call` (pure, unit-tested in the
//! namespace module) and hands it to `Requester::send`.

pub mod ai;
pub mod file_manager;
pub mod user;

pub use ai::AiApi;
pub use file_manager::FileManagerApi;
pub use user::UserApi;

/// Path used when an upload or folder creation names no parent directory.
pub const DEFAULT_PATH: &str = "/";

/// Merge query pairs like an object spread: a key in `overrides` replaces
/// the value of the same key in `base` in place, new keys are appended.
pub(crate) fn spread<'a>(
    base: &[(&'a str, &'a str)],
    overrides: &[(&'a str, &'a str)],
) -> Vec<(&'a str, &'a str)> {
    let mut out = base.to_vec();
    for &(key, value) in overrides {
        match out.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => out.push((key, value)),
        }
    }
    out
}
