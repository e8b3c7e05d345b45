pub mod model;

use async_trait::async_trait;
use kernel::{
    model::{destination::event::CreateDestination, place::PlacePhoto},
    repository::place::PlaceRepository,
};
use reqwest::{header::CONTENT_TYPE, Url};
use shared::{
    config::PlacesConfig,
    error::{AppError, AppResult},
};

use self::model::PlaceDetailsResponse;

const DETAIL_FIELDS: &str = "place_id,name,formatted_address,geometry,rating,\
user_ratings_total,photos,opening_hours,formatted_phone_number,reviews,types";
const PHOTO_MAX_WIDTH: u32 = 800;
// 保存する写真 URL は API キーを含まない中継用のパス
pub const PHOTO_PROXY_PATH: &str = "/api/v1/places/photo";

// 中継用のパスを組み立てる。写真の参照値はクエリとしてエンコードする
pub fn photo_proxy_path(photo_reference: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("reference", photo_reference)
        .finish();
    format!("{PHOTO_PROXY_PATH}?{query}")
}

pub struct PlaceRepositoryImpl {
    client: reqwest::Client,
    config: PlacesConfig,
}

impl PlaceRepositoryImpl {
    pub fn new(config: PlacesConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        Url::parse(&format!("{}/{path}", self.config.base_url.trim_end_matches('/')))
            .map_err(|e| AppError::ExternalServiceError(format!("invalid places API url: {e}")))
    }

    fn photo_source_url(&self, photo_reference: &str) -> AppResult<Url> {
        let mut url = self.endpoint("photo")?;
        url.query_pairs_mut()
            .append_pair("maxwidth", &PHOTO_MAX_WIDTH.to_string())
            .append_pair("photo_reference", photo_reference)
            .append_pair("key", &self.config.api_key);
        Ok(url)
    }
}

fn external_error(e: reqwest::Error) -> AppError {
    AppError::ExternalServiceError(format!("places API error: {e}"))
}

#[async_trait]
impl PlaceRepository for PlaceRepositoryImpl {
    async fn fetch_place(&self, place_id: &str) -> AppResult<CreateDestination> {
        let res = self
            .client
            .get(self.endpoint("details/json")?)
            .query(&[
                ("place_id", place_id),
                ("fields", DETAIL_FIELDS),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(external_error)?;

        let body: PlaceDetailsResponse = res.json().await.map_err(external_error)?;

        tracing::debug!(place_id, status = %body.status, "fetched place details");

        Ok(body.into_details()?.into_create_destination(photo_proxy_path))
    }

    async fn fetch_photo(&self, photo_reference: &str) -> AppResult<PlacePhoto> {
        let res = self
            .client
            .get(self.photo_source_url(photo_reference)?)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(external_error)?;

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let data = res.bytes().await.map_err(external_error)?.to_vec();

        Ok(PlacePhoto { content_type, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> PlaceRepositoryImpl {
        PlaceRepositoryImpl::new(PlacesConfig {
            base_url: "https://maps.example/api/place/".into(),
            api_key: "SECRET-KEY".into(),
        })
    }

    #[test]
    fn stored_photo_path_has_no_key_and_is_encoded() {
        let path = photo_proxy_path("ref&key=x");

        assert!(!path.contains("SECRET-KEY"));
        assert_eq!(path, "/api/v1/places/photo?reference=ref%26key%3Dx");
    }

    #[test]
    fn photo_source_url_keeps_reference_in_one_parameter() -> anyhow::Result<()> {
        let url = repository().photo_source_url("ref&x=1")?;

        assert_eq!(url.path(), "/api/place/photo");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("maxwidth".to_string(), "800".to_string()),
                ("photo_reference".to_string(), "ref&x=1".to_string()),
                ("key".to_string(), "SECRET-KEY".to_string()),
            ]
        );
        Ok(())
    }
}
