use reqwest::Client;

use crate::error::ResolveError;

use super::endpoints::TwitchEndpoints;
use super::probe::{Liveness, probe_liveness};
use super::token::{playback_url, request_token};
use super::types::{ChannelId, ChannelStatus, GAME_ERROR};

/**
    Resolves one channel into a status record.

    Runs the token exchange and the liveness probe. The two steps do not
    depend on each other; each failure is folded into the record instead
    of being returned.
*/
#[derive(Clone)]
pub struct StatusResolver {
    client: Client,
    endpoints: TwitchEndpoints,
}

impl StatusResolver {
    pub fn new(client: Client, endpoints: TwitchEndpoints) -> Self {
        Self { client, endpoints }
    }

    pub async fn resolve(&self, channel: &ChannelId) -> ChannelStatus {
        tracing::debug!(%channel, "resolving channel");

        let (playback, liveness) = tokio::join!(
            self.resolve_playback_url(channel),
            probe_liveness(&self.client, &self.endpoints, channel),
        );

        if let Err(e) = &playback {
            tracing::warn!(%channel, error = %e, "token exchange failed");
        }
        if let Err(e) = &liveness {
            tracing::warn!(%channel, error = %e, "liveness probe failed");
        }

        let status = fold_status(
            channel.clone(),
            self.endpoints.profile_url(channel),
            playback,
            liveness,
        );

        tracing::info!(
            %channel,
            live = status.is_live,
            viewers = %status.viewers,
            "channel resolved"
        );
        status
    }

    async fn resolve_playback_url(&self, channel: &ChannelId) -> Result<String, ResolveError> {
        let token = request_token(&self.client, &self.endpoints, channel).await?;
        playback_url(&self.endpoints, channel, &token)
    }
}

/**
    Combine the outcome of both steps into one record.

    With both steps failed the record is an error record (`game = "Error"`).
    With one failed, the other's values are kept and the failure is noted.
*/
pub fn fold_status(
    channel: ChannelId,
    profile_url: String,
    playback: Result<String, ResolveError>,
    liveness: Result<Liveness, ResolveError>,
) -> ChannelStatus {
    let mut status = ChannelStatus::offline(channel, profile_url);
    let mut errors = Vec::new();

    match playback {
        Ok(url) => status.playback_url = url,
        Err(e) => errors.push(format!("token exchange: {}", e)),
    }

    match liveness {
        Ok(liveness) => {
            status.is_live = liveness.is_live;
            if let Some(viewers) = liveness.viewers {
                status.viewers = viewers;
            }
            if let Some(game) = liveness.game {
                status.game = game;
            }
        }
        Err(e) => errors.push(format!("liveness probe: {}", e)),
    }

    if errors.len() == 2 {
        status.game = GAME_ERROR.to_string();
    }

    if !errors.is_empty() {
        status.error = Some(errors.join("; "));
    }

    status
}
