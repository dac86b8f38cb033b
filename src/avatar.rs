//! Fetching and decoding avatar images.

use crate::api::SteamApi;
use crate::cache::{keys, CacheStore};
use crate::error::AssetError;
use std::io::Cursor;
use std::sync::Arc;
use bytes::Bytes;
use image::ImageReader;

/// An image that has been fetched and successfully decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedImage {
    /// The encoded image as downloaded.
    pub data: Bytes,
    /// MIME type of the detected format, e.g. `image/jpeg`.
    pub mime: &'static str,
    pub width: u32,
    pub height: u32,
}

impl CachedImage {
    /// Detects the format of `data` and reads its dimensions.
    pub fn decode(data: Bytes) -> Result<Self, AssetError> {
        let reader = ImageReader::new(Cursor::new(data.as_ref()))
            .with_guessed_format()
            .map_err(|error| AssetError::Decode(error.to_string()))?;
        let mime = reader.format()
            .ok_or_else(|| AssetError::Decode("Unrecognized image format".into()))?
            .to_mime_type();
        let (width, height) = reader.into_dimensions()
            .map_err(|error| AssetError::Decode(error.to_string()))?;

        if width == 0 || height == 0 {
            return Err(AssetError::Decode(format!("Empty image {width}x{height}")));
        }

        Ok(Self {
            data,
            mime,
            width,
            height,
        })
    }
}

/// Loads images through the image cache.
#[derive(Clone)]
pub struct AvatarLoader {
    api: Arc<dyn SteamApi>,
    cache: CacheStore,
}

impl AvatarLoader {
    pub fn new(api: Arc<dyn SteamApi>, cache: CacheStore) -> Self {
        Self {
            api,
            cache,
        }
    }

    /// Loads the image at `url`. Failures are logged and yield `None` so the card is drawn
    /// without it.
    pub async fn load(&self, url: &str) -> Option<CachedImage> {
        let api = Arc::clone(&self.api);
        let owned_url = url.to_string();
        let result = self.cache.images.get_or_fetch(&keys::image(url), move || async move {
            let data = api.get_image(&owned_url).await
                .map_err(|error| AssetError::Fetch(Arc::new(error)))?;

            CachedImage::decode(data)
        }).await;

        match result {
            Ok(image) => Some(image),
            Err(error) => {
                log::warn!("Error loading image {url}: {error}");
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CommunityProfile, OwnedGame, PlayerSummary, PriceOverview};
    use crate::error::Error;
    use crate::types::AppId;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use async_trait::async_trait;
    use image::{ImageFormat, RgbaImage, Rgba};
    use steamid_ng::SteamID;

    fn png(width: u32, height: u32) -> Bytes {
        let image = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut buffer = Cursor::new(Vec::new());

        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        Bytes::from(buffer.into_inner())
    }

    struct ImageApi {
        downloads: AtomicUsize,
    }

    #[async_trait]
    impl SteamApi for ImageApi {
        async fn resolve_vanity_url(&self, _vanity: &str) -> Result<SteamID, Error> {
            Err(Error::Response("No match".into()))
        }

        async fn get_player_summary(&self, _steamid: SteamID) -> Result<PlayerSummary, Error> {
            Err(Error::Response("No player found".into()))
        }

        async fn get_community_profile(&self, _steamid: SteamID) -> Result<CommunityProfile, Error> {
            Ok(CommunityProfile::default())
        }

        async fn get_owned_games(&self, _steamid: SteamID) -> Result<Vec<OwnedGame>, Error> {
            Err(Error::PrivateGamesList)
        }

        async fn get_app_prices(
            &self,
            _appids: &[AppId],
            _country_code: &str,
        ) -> Result<HashMap<AppId, PriceOverview>, Error> {
            Ok(HashMap::new())
        }

        async fn get_image(&self, url: &str) -> Result<Bytes, Error> {
            self.downloads.fetch_add(1, Ordering::SeqCst);

            match url {
                "https://avatars.test/full.png" => Ok(png(184, 92)),
                "https://avatars.test/garbage" => Ok(Bytes::from_static(b"<html>not an image</html>")),
                _ => Err(Error::Http(reqwest::StatusCode::NOT_FOUND)),
            }
        }
    }

    fn loader() -> (Arc<ImageApi>, AvatarLoader) {
        let api = Arc::new(ImageApi {
            downloads: AtomicUsize::new(0),
        });
        let loader = AvatarLoader::new(Arc::clone(&api) as Arc<dyn SteamApi>, CacheStore::default());

        (api, loader)
    }

    #[test]
    fn decodes_dimensions_and_format() {
        let image = CachedImage::decode(png(4, 3)).unwrap();

        assert_eq!(image.mime, "image/png");
        assert_eq!((image.width, image.height), (4, 3));
    }

    #[test]
    fn rejects_unknown_data() {
        assert!(matches!(
            CachedImage::decode(Bytes::from_static(b"nope")),
            Err(AssetError::Decode(_)),
        ));
    }

    #[tokio::test]
    async fn loads_and_caches_images() {
        let (api, loader) = loader();
        let image = loader.load("https://avatars.test/full.png").await.unwrap();

        assert_eq!((image.width, image.height), (184, 92));
        assert!(loader.load("https://avatars.test/full.png").await.is_some());
        assert_eq!(api.downloads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_yield_none_and_are_retried() {
        let (api, loader) = loader();

        assert!(loader.load("https://avatars.test/missing.png").await.is_none());
        assert!(loader.load("https://avatars.test/garbage").await.is_none());
        assert!(loader.load("https://avatars.test/garbage").await.is_none());
        assert_eq!(api.downloads.load(Ordering::SeqCst), 3);
    }
}
