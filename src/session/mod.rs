/*!
 * Session state for the browser surface.
 *
 * - `models`: the per-session context (scripts, audio, upload marker)
 * - `manager`: the in-memory registry keyed by session id
 */

pub mod manager;
pub mod models;

pub use manager::SessionManager;
pub use models::{SessionContext, TranslatedScript};
