//! Backend trait implementations for [`GatewayClient`].

use crate::client::{GatewayClient, GENRES_TABLE, TRACKS_TABLE};
use crate::rest::Query;
use async_trait::async_trait;
use studio_core::{
    CatalogStore, Genre, GenreId, IdentityProvider, NewGenre, NewTrack, ObjectStore, OtpKind,
    Result, Session, SignUpOutcome, Track, TrackId,
};

#[async_trait]
impl IdentityProvider for GatewayClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        Ok(GatewayClient::sign_in_with_password(self, email, password).await?)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome> {
        Ok(GatewayClient::sign_up(self, email, password).await?)
    }

    async fn send_otp(&self, email: &str) -> Result<()> {
        Ok(self.auth().send_otp(email).await?)
    }

    async fn verify_otp(&self, email: &str, token: &str, kind: OtpKind) -> Result<Session> {
        Ok(GatewayClient::verify_otp(self, email, token, kind).await?)
    }

    async fn send_password_reset(&self, email: &str) -> Result<()> {
        Ok(self.auth().send_password_reset(email).await?)
    }

    async fn sign_out(&self) -> Result<()> {
        Ok(GatewayClient::sign_out(self).await?)
    }

    async fn current_session(&self) -> Option<Session> {
        self.session()
    }
}

// Every data call goes through `with_auto_refresh`, so an expired access
// token costs one refresh instead of failing the action (or, during a failed
// publish, the cleanup that follows it).
#[async_trait]
impl ObjectStore for GatewayClient {
    async fn upload(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        Ok(self
            .with_auto_refresh(move || {
                let bytes = bytes.clone();
                async move { self.storage().client().upload(path, content_type, bytes).await }
            })
            .await?)
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        Ok(self
            .with_auto_refresh(move || async move { self.storage().client().remove(paths).await })
            .await?)
    }

    fn public_url(&self, path: &str) -> String {
        crate::storage::public_url(self.url(), self.bucket(), path)
    }
}

fn genres_query() -> Query {
    Query::select("*")
        .eq("is_active", true)
        .order("name", true)
}

fn tracks_query() -> Query {
    Query::select("*, genres(name)")
        .eq("is_active", true)
        .order("created_at", false)
}

#[async_trait]
impl CatalogStore for GatewayClient {
    async fn list_genres(&self) -> Result<Vec<Genre>> {
        let query = &genres_query();
        Ok(self
            .with_auto_refresh(move || async move {
                self.table(GENRES_TABLE).client().select(query).await
            })
            .await?)
    }

    async fn insert_genre(&self, genre: &NewGenre) -> Result<Genre> {
        Ok(self
            .with_auto_refresh(move || async move {
                self.table(GENRES_TABLE).client().insert(genre).await
            })
            .await?)
    }

    async fn update_genre(&self, id: &GenreId, genre: &NewGenre) -> Result<Genre> {
        Ok(self
            .with_auto_refresh(move || async move {
                self.table(GENRES_TABLE)
                    .client()
                    .update_by_id(id.as_str(), genre)
                    .await
            })
            .await?)
    }

    async fn delete_genre(&self, id: &GenreId) -> Result<()> {
        Ok(self
            .with_auto_refresh(move || async move {
                self.table(GENRES_TABLE)
                    .client()
                    .delete_by_id(id.as_str())
                    .await
            })
            .await?)
    }

    async fn list_tracks(&self) -> Result<Vec<Track>> {
        let query = &tracks_query();
        Ok(self
            .with_auto_refresh(move || async move {
                self.table(TRACKS_TABLE).client().select(query).await
            })
            .await?)
    }

    async fn insert_track(&self, track: &NewTrack) -> Result<Track> {
        Ok(self
            .with_auto_refresh(move || async move {
                self.table(TRACKS_TABLE).client().insert(track).await
            })
            .await?)
    }

    async fn delete_track(&self, id: &TrackId) -> Result<()> {
        Ok(self
            .with_auto_refresh(move || async move {
                self.table(TRACKS_TABLE)
                    .client()
                    .delete_by_id(id.as_str())
                    .await
            })
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_listing_is_active_by_name() {
        let params = genres_query().params();
        assert!(params.contains(&("select".to_string(), "*".to_string())));
        assert!(params.contains(&("is_active".to_string(), "eq.true".to_string())));
        assert!(params.contains(&("order".to_string(), "name.asc".to_string())));
    }

    #[test]
    fn track_listing_joins_genre_newest_first() {
        let params = tracks_query().params();
        assert!(params.contains(&("select".to_string(), "*,genres(name)".to_string())));
        assert!(params.contains(&("order".to_string(), "created_at.desc".to_string())));
    }
}
