//! Permission state probing.

use futures::future::join_all;

use crate::host::{HostEnvironment, PermissionName, PermissionState};
use crate::snapshot::PermissionStates;

/// Query every permission concurrently. A query that fails marks only its
/// own entry `unsupported`.
pub(crate) async fn probe_permissions<H: HostEnvironment + ?Sized>(host: &H) -> PermissionStates {
    let queries = PermissionName::ALL.into_iter().map(|name| async move {
        let state = match host.query_permission(name).await {
            Ok(state) => state,
            Err(e) => {
                log::debug!("permission query for {} failed: {}", name.as_str(), e);
                PermissionState::Unsupported
            }
        };
        (name, state)
    });

    join_all(queries).await.into_iter().collect()
}
