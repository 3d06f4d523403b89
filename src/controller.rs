// Display options controller module
// Ratio/background toggle state for the framing screen, plus the hand-off of a
// freshly saved photo to the share target app

use crate::error::LibraryError;
use crate::library::{AssetQuery, AssetStore};
use crate::modes::{next_background, next_ratio, BackgroundMode, RatioMode};
use crate::observable::{Observable, Trigger};
use crate::presentation::{Alert, AlertPresenter};
use crate::share::{ShareTarget, ShareUrl, UrlOpener};
use log::{debug, error, info};
use std::rc::Rc;

/// OS collaborators the controller talks to after a save
#[derive(Clone)]
pub struct Services {
    pub assets: Rc<dyn AssetStore>,
    pub opener: Rc<dyn UrlOpener>,
    pub presenter: Rc<dyn AlertPresenter>,
    pub target: ShareTarget,
}

/// Snapshot of both toggle axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerState {
    pub ratio: RatioMode,
    pub background: BackgroundMode,
}

/// Which branch a save completion took
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandOff {
    /// The save reported an error; it was logged
    SaveFailed,
    /// The library had no image to hand off
    NoAsset,
    /// The target app was asked to open this link
    Opened(ShareUrl),
    /// The target app is missing; the user was told
    AlertShown,
}

/// State holder behind the framing screen.
///
/// The presentation layer fires `ratio_tap`/`background_tap` and renders
/// whatever `ratio`/`background` publish. Everything runs on the UI thread.
pub struct DisplayOptionsController {
    ratio: Rc<Observable<RatioMode>>,
    background: Rc<Observable<BackgroundMode>>,
    ratio_tap: Trigger,
    background_tap: Trigger,
    services: Services,
}

impl DisplayOptionsController {
    pub fn new(services: Services) -> Self {
        let initial = ControllerState::default();
        let ratio = Rc::new(Observable::new(initial.ratio));
        let background = Rc::new(Observable::new(initial.background));

        let ratio_tap = Trigger::new();
        let cell = Rc::clone(&ratio);
        ratio_tap.subscribe(move || {
            let next = next_ratio(cell.get());
            info!("Ratio changed to {}", next);
            cell.set(next);
        });

        let background_tap = Trigger::new();
        let cell = Rc::clone(&background);
        background_tap.subscribe(move || {
            let next = next_background(&cell.get());
            info!("Background changed to {}", next);
            cell.set(next);
        });

        Self {
            ratio,
            background,
            ratio_tap,
            background_tap,
            services,
        }
    }

    /// Advance Square -> Portrait -> Landscape -> Square
    pub fn request_ratio_toggle(&self) {
        self.ratio_tap.fire();
    }

    /// Flip between blur and solid black
    pub fn request_background_toggle(&self) {
        self.background_tap.fire();
    }

    /// Tap intake for the ratio button
    pub fn ratio_tap(&self) -> &Trigger {
        &self.ratio_tap
    }

    /// Tap intake for the background button
    pub fn background_tap(&self) -> &Trigger {
        &self.background_tap
    }

    pub fn ratio(&self) -> &Observable<RatioMode> {
        &self.ratio
    }

    pub fn background(&self) -> &Observable<BackgroundMode> {
        &self.background
    }

    pub fn state(&self) -> ControllerState {
        ControllerState {
            ratio: self.ratio.get(),
            background: self.background.get(),
        }
    }

    /// Completion of an image save into the photo library.
    ///
    /// On success the newest image in the library goes to the share target,
    /// or an alert is shown when the target app is not installed.
    pub fn on_asset_save_completed(&self, outcome: Result<(), LibraryError>) -> HandOff {
        if let Err(e) = outcome {
            error!("Saving image failed: {}", e);
            return HandOff::SaveFailed;
        }

        let assets = match self.services.assets.fetch_assets(&AssetQuery::latest_images()) {
            Ok(assets) => assets,
            Err(e) => {
                error!("Photo library query failed: {}", e);
                return HandOff::NoAsset;
            }
        };
        let Some(latest) = assets.first() else {
            debug!("Photo library has no images after save");
            return HandOff::NoAsset;
        };

        let target = &self.services.target;
        let url = ShareUrl::library_asset(target, &latest.local_identifier);
        if self.services.opener.can_open(&url) {
            info!("Handing {} to {}", latest.local_identifier, target.name);
            self.services.opener.open(&url);
            HandOff::Opened(url)
        } else {
            self.services.presenter.present(Alert::acknowledgement(
                "Error",
                format!("{} is not installed", target.name),
            ));
            HandOff::AlertShown
        }
    }
}
