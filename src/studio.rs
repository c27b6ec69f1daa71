use std::sync::Arc;

use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    capture::{CaptureProvider, CAMERA_ERROR_MESSAGE},
    config::Config,
    error::{Result, WardrobeError},
    export::Artifact,
    gateway::{CredentialProvider, TransformationGateway},
    session::{Session, SessionMachine, StepKind},
    share::{self, DeepLink},
    styles::StylePreset,
    wardrobe::StyleLibrary,
};

/// Async front door to the app
///
/// Combines the session machine with the gateway, the credential check and
/// the style library. Locks are held only around synchronous handlers; no
/// lock is held while a gateway call is pending, so a reset can always get
/// through and the late result is discarded by the machine.
pub struct Studio {
    machine: Mutex<SessionMachine>,
    library: Mutex<StyleLibrary>,
    gateway: Arc<dyn TransformationGateway>,
    credentials: Arc<dyn CredentialProvider>,
    key_selection: Mutex<()>,
    share_base: Url,
}

impl Studio {
    pub fn new(
        config: &Config,
        library: StyleLibrary,
        gateway: Arc<dyn TransformationGateway>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            machine: Mutex::new(SessionMachine::new(config.session.clone())),
            library: Mutex::new(library),
            gateway,
            credentials,
            key_selection: Mutex::new(()),
            share_base: share::parse_base(share::DEFAULT_BASE_URL)?,
        })
    }

    /// Page URL that share links are built on
    pub fn with_share_base(mut self, base: Url) -> Self {
        self.share_base = base;
        self
    }

    /// Snapshot of the session
    pub async fn session(&self) -> Session {
        self.machine.lock().await.session().clone()
    }

    /// Direct access for synchronous UI handlers (drafts, toggles, selection)
    pub async fn machine(&self) -> MutexGuard<'_, SessionMachine> {
        self.machine.lock().await
    }

    pub async fn library(&self) -> MutexGuard<'_, StyleLibrary> {
        self.library.lock().await
    }

    pub async fn progress(&self) -> watch::Receiver<String> {
        self.machine.lock().await.progress()
    }

    /// Apply a share link the app was opened with
    pub async fn open_link(&self, link: &str) -> DeepLink {
        let mut machine = self.machine.lock().await;
        let library = self.library.lock().await;

        let decoded = share::decode_str(link, library.catalog());
        if decoded != DeepLink::None {
            info!("🔗 Applying shared link");
        }
        machine.apply_deep_link(decoded.clone());
        decoded
    }

    /// Select a style from the combined catalog by id
    pub async fn select_style(&self, id: &str) -> Result<StylePreset> {
        let mut machine = self.machine.lock().await;
        let library = self.library.lock().await;

        let style = library
            .catalog()
            .get_style(id)
            .cloned()
            .ok_or_else(|| WardrobeError::NotFound { id: id.to_string() })?;
        machine.select_style(style.clone());
        Ok(style)
    }

    // ==========================================
    // CAMERA
    // ==========================================

    /// `welcome -> camera` and open the device
    pub async fn start_camera(&self, provider: &mut CaptureProvider) -> Result<()> {
        let mut machine = self.machine.lock().await;
        machine.start()?;
        Self::open_device(&mut machine, provider, |p| p.start())
    }

    /// Switch between front and back cameras
    ///
    /// After a device failure the camera stays closed until the user leaves
    /// the camera screen and comes back.
    pub async fn toggle_camera(&self, provider: &mut CaptureProvider) -> Result<()> {
        let mut machine = self.machine.lock().await;
        if machine.kind() != StepKind::Camera || machine.session().error().is_some() {
            debug!("Camera toggle ignored in {} step", machine.kind());
            return Ok(());
        }
        Self::open_device(&mut machine, provider, |p| p.toggle_facing())
    }

    fn open_device(
        machine: &mut SessionMachine,
        provider: &mut CaptureProvider,
        open: impl FnOnce(&mut CaptureProvider) -> Result<()>,
    ) -> Result<()> {
        if let Err(e) = open(provider) {
            machine.camera_failed(provider.error().unwrap_or(CAMERA_ERROR_MESSAGE));
            return Err(e);
        }
        Ok(())
    }

    /// Take the picture, leave the camera, and describe the outfit
    pub async fn capture(&self, provider: &mut CaptureProvider) -> Result<()> {
        let (ticket, image) = {
            let mut machine = self.machine.lock().await;
            let captured = provider.capture()?;
            let started = machine.capture(captured)?;
            provider.shutdown();
            started
        };

        let outcome = self.gateway.analyze(&image).await;
        self.machine.lock().await.complete_analysis(ticket, outcome);
        Ok(())
    }

    /// `camera -> welcome`
    pub async fn cancel_camera(&self, provider: &mut CaptureProvider) -> Result<()> {
        provider.shutdown();
        self.machine.lock().await.cancel_camera()?;
        Ok(())
    }

    // ==========================================
    // GATEWAY OPERATIONS
    // ==========================================

    /// Run the outfit transformation; returns the step it ended on
    ///
    /// Gateway failures are not errors here: they land in the session as a
    /// message on the review screen.
    pub async fn transform(&self) -> Result<StepKind> {
        let (ticket, request) = self.machine.lock().await.begin_transform()?;

        let outcome = self.gateway.transform(&request).await;
        if let Err(e) = &outcome {
            warn!("Transform call failed: {}", e);
        }

        let mut machine = self.machine.lock().await;
        machine.complete_transform(ticket, outcome);
        Ok(machine.kind())
    }

    /// Generate a video of the result; returns the step it ended on
    ///
    /// Only offered on an image result. Runs the key selection step first
    /// when no key is available; a failed selection leaves the session
    /// untouched.
    pub async fn animate(&self) -> Result<StepKind> {
        self.machine.lock().await.can_animate()?;
        {
            let _selecting = self.key_selection.lock().await;
            if !self.credentials.has_selected_key().await {
                debug!("No API key selected, asking for one");
                self.credentials.open_select_key().await?;
            }
        }

        let (ticket, request) = self.machine.lock().await.begin_animate()?;

        let outcome = self.gateway.animate(&request).await;
        if let Err(e) = &outcome {
            warn!("Animate call failed: {}", e);
        }

        let mut machine = self.machine.lock().await;
        machine.complete_animate(ticket, outcome);
        Ok(machine.kind())
    }

    pub async fn back(&self) -> Result<()> {
        self.machine.lock().await.back()?;
        Ok(())
    }

    pub async fn reset(&self) {
        self.machine.lock().await.reset();
    }

    // ==========================================
    // WARDROBE
    // ==========================================

    pub async fn toggle_favorite(&self, id: &str) -> Result<bool> {
        self.library.lock().await.toggle_favorite(id)
    }

    /// Save the custom prompt under the name typed in the naming dialog
    pub async fn save_custom_style(&self) -> Result<StylePreset> {
        let mut machine = self.machine.lock().await;
        let mut library = self.library.lock().await;

        let drafts = machine.session().drafts();
        let name = drafts.naming.clone().unwrap_or_default();
        let prompt = drafts.custom_prompt.clone();
        let style = library.create_custom_style(&name, &prompt)?;

        machine.select_style(style.clone());
        machine.close_naming();
        machine.set_toast("Style saved to your collection!");
        Ok(style)
    }

    /// Delete a custom style everywhere it is referenced
    pub async fn delete_style(&self, id: &str) -> Result<()> {
        let mut machine = self.machine.lock().await;
        let mut library = self.library.lock().await;

        library.delete_custom_style(id)?;
        machine.clear_selection_if(id);
        machine.set_toast("Style deleted.");
        Ok(())
    }

    // ==========================================
    // SHARING
    // ==========================================

    pub async fn share_style(&self, id: &str) -> Result<Url> {
        let mut machine = self.machine.lock().await;
        let library = self.library.lock().await;

        let style = library
            .catalog()
            .get_style(id)
            .ok_or_else(|| WardrobeError::NotFound { id: id.to_string() })?;
        let link = share::style_link(&self.share_base, style);
        machine.set_toast(format!("Link for {} copied!", style.name));
        Ok(link)
    }

    pub async fn share_custom_prompt(&self) -> Result<Url> {
        let mut machine = self.machine.lock().await;
        let link = share::custom_link(&self.share_base, &machine.session().drafts().custom_prompt)?;
        machine.set_toast("Custom style link copied!");
        Ok(link)
    }

    /// What the result screen would save or share right now
    pub async fn artifact(&self) -> Option<Artifact> {
        Artifact::from_step(self.machine.lock().await.session().step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CameraDevice, CameraStream, DataUri, Facing};
    use crate::config::CaptureConfig;
    use crate::error::{CaptureError, GatewayError, LuminaError, SessionError};
    use crate::gateway::{AnimateRequest, StaticCredentials, TransformRequest};
    use crate::session::{ANIMATE_FAILED, TRANSFORM_FAILED};
    use crate::wardrobe::MemoryStore;
    use async_trait::async_trait;
    use image::{Rgba, RgbaImage};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct MockGateway {
        analysis: Option<String>,
        transforms: std::sync::Mutex<VecDeque<bool>>,
        animations: std::sync::Mutex<VecDeque<bool>>,
        delay: Duration,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockGateway {
        fn new(analysis: Option<&str>) -> Self {
            Self {
                analysis: analysis.map(str::to_string),
                transforms: Default::default(),
                animations: Default::default(),
                delay: Duration::from_millis(100),
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn transforms(self, outcomes: &[bool]) -> Self {
            *self.transforms.lock().unwrap() = outcomes.iter().copied().collect();
            self
        }

        fn animations(self, outcomes: &[bool]) -> Self {
            *self.animations.lock().unwrap() = outcomes.iter().copied().collect();
            self
        }

        async fn call(&self, queue: &std::sync::Mutex<VecDeque<bool>>) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            queue.lock().unwrap().pop_front().unwrap_or(true)
        }

        fn failure() -> LuminaError {
            GatewayError::Api { status: 500, body: "mock".to_string() }.into()
        }
    }

    #[async_trait]
    impl TransformationGateway for MockGateway {
        async fn analyze(&self, _image: &DataUri) -> crate::error::Result<String> {
            self.analysis.clone().ok_or_else(Self::failure)
        }

        async fn transform(&self, _request: &TransformRequest) -> crate::error::Result<DataUri> {
            if self.call(&self.transforms).await {
                Ok(DataUri::new("image/png", vec![42]))
            } else {
                Err(Self::failure())
            }
        }

        async fn animate(&self, _request: &AnimateRequest) -> crate::error::Result<DataUri> {
            if self.call(&self.animations).await {
                Ok(DataUri::new("video/mp4", vec![7]))
            } else {
                Err(Self::failure())
            }
        }
    }

    struct FlatCamera;

    struct FlatStream;

    impl CameraStream for FlatStream {
        fn grab_frame(&mut self) -> crate::error::Result<RgbaImage> {
            Ok(RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])))
        }

        fn stop(&mut self) {}
    }

    impl CameraDevice for FlatCamera {
        fn open(&mut self, _facing: Facing, _config: &CaptureConfig) -> crate::error::Result<Box<dyn CameraStream>> {
            Ok(Box::new(FlatStream))
        }
    }

    struct BrokenCamera;

    impl CameraDevice for BrokenCamera {
        fn open(&mut self, _facing: Facing, _config: &CaptureConfig) -> crate::error::Result<Box<dyn CameraStream>> {
            Err(CaptureError::DeviceUnavailable { reason: "denied".to_string() }.into())
        }
    }

    /// Fails the first open, works afterwards
    struct FlakyCamera {
        opens: Arc<AtomicUsize>,
    }

    impl CameraDevice for FlakyCamera {
        fn open(&mut self, _facing: Facing, _config: &CaptureConfig) -> crate::error::Result<Box<dyn CameraStream>> {
            if self.opens.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(CaptureError::DeviceUnavailable { reason: "busy".to_string() }.into());
            }
            Ok(Box::new(FlatStream))
        }
    }

    /// Selection that takes a while and counts how often it ran
    struct SlowSelection {
        key: tokio::sync::RwLock<Option<String>>,
        selections: AtomicUsize,
    }

    #[async_trait]
    impl CredentialProvider for SlowSelection {
        async fn has_selected_key(&self) -> bool {
            self.key.read().await.is_some()
        }

        async fn open_select_key(&self) -> crate::error::Result<()> {
            self.selections.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            *self.key.write().await = Some("picked".to_string());
            Ok(())
        }

        async fn api_key(&self) -> Option<String> {
            self.key.read().await.clone()
        }
    }

    fn studio_with(gateway: MockGateway, credentials: StaticCredentials) -> (Arc<Studio>, Arc<MockGateway>, MemoryStore) {
        let store = MemoryStore::new();
        let library = StyleLibrary::load(Box::new(store.clone())).unwrap();
        let gateway = Arc::new(gateway);
        let studio = Studio::new(&Config::default(), library, gateway.clone(), Arc::new(credentials)).unwrap();
        (Arc::new(studio), gateway, store)
    }

    fn studio(gateway: MockGateway) -> (Arc<Studio>, Arc<MockGateway>, MemoryStore) {
        studio_with(gateway, StaticCredentials::new(Some("key")))
    }

    fn camera() -> CaptureProvider {
        CaptureProvider::new(Box::new(FlatCamera), CaptureConfig::default())
    }

    async fn to_review(studio: &Studio) {
        let mut provider = camera();
        studio.start_camera(&mut provider).await.unwrap();
        studio.capture(&mut provider).await.unwrap();
        assert!(!provider.is_running());
    }

    async fn to_result(studio: &Studio) {
        to_review(studio).await;
        studio.select_style("formal").await.unwrap();
        assert_eq!(studio.transform().await.unwrap(), StepKind::Result);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_failure_scenario() {
        let (studio, _, _) = studio(MockGateway::new(None));
        to_review(&studio).await;

        let session = studio.session().await;
        assert_eq!(session.kind(), StepKind::Review);
        assert_eq!(session.drafts().base_description, "modern clothes");
        assert!(session.error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_executive_transform_scenario() {
        let (studio, _, _) = studio(MockGateway::new(Some("a hoodie")));
        to_review(&studio).await;
        studio.machine().await.set_intensity(30);
        studio.select_style("formal").await.unwrap();

        assert_eq!(studio.transform().await.unwrap(), StepKind::Result);
        let session = studio.session().await;
        assert_eq!(session.drafts().intensity, 100);
        assert!(session.error().is_none());
        assert_eq!(session.style_label(), "Executive");
        assert!(matches!(studio.artifact().await, Some(Artifact::Image(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transform_rejection_scenario() {
        let (studio, _, _) = studio(MockGateway::new(Some("a hoodie")).transforms(&[false]));
        to_review(&studio).await;
        studio.select_style("formal").await.unwrap();
        let before = studio.session().await.step().capture().cloned();

        assert_eq!(studio.transform().await.unwrap(), StepKind::Review);
        let session = studio.session().await;
        assert_eq!(session.error(), Some(TRANSFORM_FAILED));
        assert_eq!(session.step().capture().cloned(), before);
        assert_eq!(session.selected_style().map(|s| s.id.as_str()), Some("formal"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_animate_calls_never_overlap() {
        let (studio, gateway, _) = studio(MockGateway::new(Some("a hoodie")).animations(&[false, true]));
        to_result(&studio).await;
        let transform_calls = gateway.calls.load(Ordering::SeqCst);

        let (first, second) = tokio::join!(studio.animate(), studio.animate());
        assert_eq!(first.unwrap(), StepKind::Result);
        assert!(matches!(
            second,
            Err(LuminaError::Session(SessionError::InvalidTransition { .. }))
        ));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), transform_calls + 1);
        assert_eq!(gateway.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(studio.session().await.error(), Some(ANIMATE_FAILED));

        // After the first resolves, a new attempt is issued and succeeds
        assert_eq!(studio.animate().await.unwrap(), StepKind::Result);
        let session = studio.session().await;
        assert!(session.step().video().is_some());
        assert!(session.error().is_none());
        assert!(matches!(studio.artifact().await, Some(Artifact::Video(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_animate_runs_key_selection_first() {
        let (studio, _, _) = studio_with(
            MockGateway::new(Some("a hoodie")),
            StaticCredentials::new(None).selecting("picked"),
        );
        to_result(&studio).await;
        assert_eq!(studio.animate().await.unwrap(), StepKind::Result);
        assert!(studio.session().await.step().video().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_animate_without_key_keeps_result() {
        let (studio, gateway, _) = studio_with(MockGateway::new(Some("a hoodie")), StaticCredentials::new(None));
        to_result(&studio).await;
        let calls = gateway.calls.load(Ordering::SeqCst);

        assert!(studio.animate().await.is_err());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), calls);
        let session = studio.session().await;
        assert_eq!(session.kind(), StepKind::Result);
        assert!(session.step().result_image().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_during_transform_discards_result() {
        let (studio, _, _) = studio(MockGateway::new(Some("a hoodie")));
        to_review(&studio).await;
        studio.select_style("formal").await.unwrap();

        let (outcome, _) = tokio::join!(studio.transform(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            studio.reset().await;
        });

        assert_eq!(outcome.unwrap(), StepKind::Welcome);
        assert_eq!(studio.session().await, Session::default());
        assert!(!studio.machine().await.ticker_active());
    }

    #[tokio::test]
    async fn test_camera_failure_blocks_capture() {
        let (studio, _, _) = studio(MockGateway::new(None));
        let mut provider = CaptureProvider::new(Box::new(BrokenCamera), CaptureConfig::default());

        assert!(studio.start_camera(&mut provider).await.is_err());
        let session = studio.session().await;
        assert_eq!(session.kind(), StepKind::Camera);
        assert_eq!(session.error(), Some(CAMERA_ERROR_MESSAGE));

        assert!(studio.capture(&mut provider).await.is_err());
        studio.cancel_camera(&mut provider).await.unwrap();
        assert_eq!(studio.session().await, Session::default());
    }

    #[tokio::test]
    async fn test_toggle_after_device_failure_keeps_camera_closed() {
        let (studio, _, _) = studio(MockGateway::new(None));
        let opens = Arc::new(AtomicUsize::new(0));
        let device = FlakyCamera { opens: opens.clone() };
        let mut provider = CaptureProvider::new(Box::new(device), CaptureConfig::default());

        assert!(studio.start_camera(&mut provider).await.is_err());
        studio.toggle_camera(&mut provider).await.unwrap();

        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert!(!provider.is_running());
        assert_eq!(provider.error(), Some(CAMERA_ERROR_MESSAGE));
        assert_eq!(studio.session().await.error(), Some(CAMERA_ERROR_MESSAGE));

        // Leaving and re-entering the camera screen retries the device
        studio.cancel_camera(&mut provider).await.unwrap();
        studio.start_camera(&mut provider).await.unwrap();
        assert_eq!(opens.load(Ordering::SeqCst), 2);
        assert!(provider.is_running());
        assert!(studio.session().await.error().is_none());
    }

    #[tokio::test]
    async fn test_animate_outside_result_skips_key_selection() {
        let store = MemoryStore::new();
        let library = StyleLibrary::load(Box::new(store)).unwrap();
        let credentials = Arc::new(StaticCredentials::new(None).selecting("picked"));
        let studio = Studio::new(
            &Config::default(),
            library,
            Arc::new(MockGateway::new(Some("a hoodie"))),
            credentials.clone(),
        )
        .unwrap();

        assert!(matches!(
            studio.animate().await,
            Err(LuminaError::Session(SessionError::InvalidTransition { .. }))
        ));
        assert!(!credentials.has_selected_key().await);

        to_review(&studio).await;
        assert!(studio.animate().await.is_err());
        assert!(!credentials.has_selected_key().await);
        assert_eq!(studio.session().await.kind(), StepKind::Review);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_animate_selects_key_once() {
        let credentials = Arc::new(SlowSelection {
            key: Default::default(),
            selections: AtomicUsize::new(0),
        });
        let library = StyleLibrary::load(Box::new(MemoryStore::new())).unwrap();
        let gateway = Arc::new(MockGateway::new(Some("a hoodie")));
        let studio = Studio::new(&Config::default(), library, gateway.clone(), credentials.clone()).unwrap();
        to_result(&studio).await;

        let (first, second) = tokio::join!(studio.animate(), studio.animate());
        assert_eq!(first.unwrap(), StepKind::Result);
        assert!(second.is_err());
        assert_eq!(credentials.selections.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.max_in_flight.load(Ordering::SeqCst), 1);
        assert!(studio.session().await.step().video().is_some());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.session.progress_interval_ms = 0;
        let library = StyleLibrary::load(Box::new(MemoryStore::new())).unwrap();
        let studio = Studio::new(
            &config,
            library,
            Arc::new(MockGateway::new(None)),
            Arc::new(StaticCredentials::new(None)),
        );
        assert!(studio.is_err());
    }

    #[tokio::test]
    async fn test_save_and_delete_custom_style() {
        let (studio, _, store) = studio(MockGateway::new(None));
        {
            let mut machine = studio.machine().await;
            machine.set_custom_prompt("a velvet cape with gold trim");
            machine.open_naming();
            machine.set_naming_name("Velvet Royale");
        }

        let style = studio.save_custom_style().await.unwrap();
        let session = studio.session().await;
        assert_eq!(session.selected_style(), Some(&style));
        assert!(session.drafts().custom_prompt.is_empty());
        assert!(session.drafts().naming.is_none());
        assert_eq!(session.drafts().toast.as_deref(), Some("Style saved to your collection!"));

        studio.toggle_favorite(&style.id).await.unwrap();
        studio.delete_style(&style.id).await.unwrap();

        let session = studio.session().await;
        assert!(session.selected_style().is_none());
        assert!(!studio.library().await.catalog().has_style(&style.id));
        assert!(store.snapshot().favorites.is_empty());
        assert!(store.snapshot().user_styles.is_empty());
    }

    #[tokio::test]
    async fn test_save_needs_a_name() {
        let (studio, _, _) = studio(MockGateway::new(None));
        studio.machine().await.set_custom_prompt("a velvet cape");
        assert!(studio.save_custom_style().await.is_err());
        assert_eq!(studio.session().await.drafts().custom_prompt, "a velvet cape");
    }

    #[tokio::test]
    async fn test_shared_links_round_trip_through_studio() {
        let (studio, _, _) = studio(MockGateway::new(None));
        let link = studio.share_style("regal").await.unwrap();
        assert_eq!(studio.session().await.drafts().toast.as_deref(), Some("Link for Royal Gala copied!"));

        let (fresh, _, _) = studio_with(MockGateway::new(None), StaticCredentials::new(None));
        assert!(matches!(fresh.open_link(link.as_str()).await, DeepLink::Style(_)));
        assert_eq!(fresh.session().await.selected_style().map(|s| s.id.as_str()), Some("regal"));

        studio.machine().await.set_custom_prompt("a trench coat");
        let custom = studio.share_custom_prompt().await.unwrap();
        fresh.open_link(custom.as_str()).await;
        let session = fresh.session().await;
        assert_eq!(session.drafts().custom_prompt, "a trench coat");
        assert!(session.selected_style().is_none());

        let before = fresh.session().await;
        assert_eq!(fresh.open_link("https://lumina.app/?custom=%%%").await, DeepLink::None);
        assert_eq!(fresh.session().await, before);
    }

    #[tokio::test]
    async fn test_unknown_style_selection() {
        let (studio, _, _) = studio(MockGateway::new(None));
        assert!(studio.select_style("nope").await.is_err());
        assert!(studio.share_style("nope").await.is_err());
    }
}
