//! Gate Router Helpers

use axum::Router;
use axum::middleware::from_fn_with_state;

use crate::domain::repository::CredentialVerifier;
use crate::presentation::middleware::{FormAuthState, form_auth_gate};

/// Put every route of `router` behind the gate
///
/// The login action needs no route of its own: the gate answers it before
/// routing happens.
pub fn protect<S, V>(router: Router<S>, state: FormAuthState<V>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    V: CredentialVerifier + Sync + 'static,
{
    router.layer(from_fn_with_state(state, form_auth_gate::<V>))
}
