use std::sync::Arc;

use crate::config::Config;
use crate::email::TransportChain;
use crate::identity::DynCredentialIssuer;
use crate::store::DynResetStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub store: DynResetStore,
    pub transports: TransportChain,
    pub issuer: Option<DynCredentialIssuer>,
}
