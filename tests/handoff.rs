use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, UNIX_EPOCH};

use image::{DynamicImage, Rgba, RgbaImage};
use reframe::app::{App, EDITOR_SCREEN};
use reframe::controller::{DisplayOptionsController, HandOff, Services};
use reframe::library::{Asset, AssetQuery, AssetStore, DirectoryLibrary, MediaFilter, MediaType, SortOrder};
use reframe::presentation::{Alert, AlertPresenter, ViewContent};
use reframe::share::{ShareTarget, ShareUrl, UrlOpener};
use reframe::LibraryError;

/// Asset store returning fixed identifiers and counting queries
struct FakeLibrary {
    ids: Vec<&'static str>,
    queries: RefCell<Vec<AssetQuery>>,
}

impl FakeLibrary {
    fn with(ids: &[&'static str]) -> Rc<Self> {
        Rc::new(Self {
            ids: ids.to_vec(),
            queries: RefCell::new(Vec::new()),
        })
    }
}

impl AssetStore for FakeLibrary {
    fn fetch_assets(&self, query: &AssetQuery) -> Result<Vec<Asset>, LibraryError> {
        self.queries.borrow_mut().push(*query);
        Ok(self
            .ids
            .iter()
            .enumerate()
            .map(|(i, id)| Asset {
                local_identifier: id.to_string(),
                media_type: MediaType::Image,
                created: UNIX_EPOCH + Duration::from_secs(1000 - i as u64),
            })
            .collect())
    }
}

struct BrokenLibrary;

impl AssetStore for BrokenLibrary {
    fn fetch_assets(&self, _query: &AssetQuery) -> Result<Vec<Asset>, LibraryError> {
        Err(LibraryError::NotFound("/gone".into()))
    }
}

/// Opener that records checks and opens
struct FakeOpener {
    installed: bool,
    checked: RefCell<Vec<String>>,
    opened: RefCell<Vec<String>>,
}

impl FakeOpener {
    fn new(installed: bool) -> Rc<Self> {
        Rc::new(Self {
            installed,
            checked: RefCell::new(Vec::new()),
            opened: RefCell::new(Vec::new()),
        })
    }
}

impl UrlOpener for FakeOpener {
    fn can_open(&self, url: &ShareUrl) -> bool {
        self.checked.borrow_mut().push(url.to_string());
        self.installed
    }

    fn open(&self, url: &ShareUrl) {
        self.opened.borrow_mut().push(url.to_string());
    }
}

#[derive(Default)]
struct FakePresenter {
    alerts: RefCell<Vec<Alert>>,
}

impl AlertPresenter for FakePresenter {
    fn present(&self, alert: Alert) {
        self.alerts.borrow_mut().push(alert);
    }
}

struct Harness {
    controller: DisplayOptionsController,
    library: Rc<FakeLibrary>,
    opener: Rc<FakeOpener>,
    presenter: Rc<FakePresenter>,
}

fn harness(ids: &[&'static str], installed: bool) -> Harness {
    let library = FakeLibrary::with(ids);
    let opener = FakeOpener::new(installed);
    let presenter = Rc::new(FakePresenter::default());
    let controller = DisplayOptionsController::new(Services {
        assets: library.clone(),
        opener: opener.clone(),
        presenter: presenter.clone(),
        target: ShareTarget::default(),
    });
    Harness {
        controller,
        library,
        opener,
        presenter,
    }
}

#[test]
fn failed_save_touches_nothing() {
    let h = harness(&["ABC123"], true);
    let handoff = h
        .controller
        .on_asset_save_completed(Err(LibraryError::NotFound("/photos".into())));

    assert_eq!(handoff, HandOff::SaveFailed);
    assert!(h.library.queries.borrow().is_empty());
    assert!(h.opener.checked.borrow().is_empty());
    assert!(h.opener.opened.borrow().is_empty());
    assert!(h.presenter.alerts.borrow().is_empty());
}

#[test]
fn installed_app_receives_newest_asset() {
    let h = harness(&["ABC123", "OLDER9"], true);
    let handoff = h.controller.on_asset_save_completed(Ok(()));

    let expected = "instagram://library?LocalIdentifier=ABC123";
    assert_eq!(
        handoff,
        HandOff::Opened(ShareUrl::library_asset(&ShareTarget::default(), "ABC123"))
    );
    assert_eq!(*h.library.queries.borrow(), vec![AssetQuery {
        filter: MediaFilter::Images,
        order: SortOrder::NewestFirst,
    }]);
    assert_eq!(*h.opener.opened.borrow(), vec![expected.to_string()]);
    assert!(h.presenter.alerts.borrow().is_empty());
}

#[test]
fn missing_app_shows_alert_instead() {
    let h = harness(&["ABC123"], false);
    let handoff = h.controller.on_asset_save_completed(Ok(()));

    assert_eq!(handoff, HandOff::AlertShown);
    assert!(h.opener.opened.borrow().is_empty());
    let alerts = h.presenter.alerts.borrow();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].title, "Error");
    assert_eq!(alerts[0].message, "Instagram is not installed");
    assert_eq!(alerts[0].actions.len(), 1);
}

#[test]
fn empty_library_does_nothing() {
    let h = harness(&[], true);
    assert_eq!(h.controller.on_asset_save_completed(Ok(())), HandOff::NoAsset);
    assert_eq!(h.library.queries.borrow().len(), 1);
    assert!(h.opener.checked.borrow().is_empty());
    assert!(h.opener.opened.borrow().is_empty());
    assert!(h.presenter.alerts.borrow().is_empty());
}

#[test]
fn failing_query_is_treated_as_empty() {
    let opener = FakeOpener::new(true);
    let presenter = Rc::new(FakePresenter::default());
    let controller = DisplayOptionsController::new(Services {
        assets: Rc::new(BrokenLibrary),
        opener: opener.clone(),
        presenter: presenter.clone(),
        target: ShareTarget::default(),
    });
    assert_eq!(controller.on_asset_save_completed(Ok(())), HandOff::NoAsset);
    assert!(opener.opened.borrow().is_empty());
    assert!(presenter.alerts.borrow().is_empty());
}

#[test]
fn alert_names_configured_target() {
    let presenter = Rc::new(FakePresenter::default());
    let controller = DisplayOptionsController::new(Services {
        assets: FakeLibrary::with(&["X"]),
        opener: FakeOpener::new(false),
        presenter: presenter.clone(),
        target: ShareTarget::new("Pixelfed", "pixelfed"),
    });
    controller.on_asset_save_completed(Ok(()));
    assert_eq!(presenter.alerts.borrow()[0].message, "Pixelfed is not installed");
}

#[test]
fn toggles_do_not_reach_collaborators() {
    let h = harness(&["ABC123"], true);
    let changes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&changes);
    h.controller.background().subscribe(move |_| counter.set(counter.get() + 1));

    h.controller.request_ratio_toggle();
    h.controller.request_background_toggle();
    h.controller.request_background_toggle();

    assert_eq!(changes.get(), 3);
    assert!(h.library.queries.borrow().is_empty());
    assert!(h.opener.opened.borrow().is_empty());
}

fn sample_image() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([200, 100, 50, 255])))
}

#[test]
fn app_saves_then_alerts_on_screen_when_app_missing() {
    let dir = tempfile::tempdir().unwrap();
    let library = DirectoryLibrary::open(dir.path()).unwrap();
    let opener = FakeOpener::new(false);
    let app = App::new(library, |library, windows| Services {
        assets: library,
        opener: opener.clone(),
        presenter: windows,
        target: ShareTarget::default(),
    });

    assert_eq!(app.save_and_share(&sample_image()), HandOff::AlertShown);
    match app.windows.topmost() {
        Some(ViewContent::Alert(alert)) => assert_eq!(alert.message, "Instagram is not installed"),
        other => panic!("expected alert on top, got {other:?}"),
    }

    app.acknowledge_alerts();
    assert_eq!(
        app.windows.topmost(),
        Some(ViewContent::Screen(EDITOR_SCREEN.to_string()))
    );
}

#[test]
fn app_hands_saved_file_to_installed_app() {
    let dir = tempfile::tempdir().unwrap();
    let library = DirectoryLibrary::open(dir.path()).unwrap();
    let opener = FakeOpener::new(true);
    let app = App::new(library, |library, windows| Services {
        assets: library,
        opener: opener.clone(),
        presenter: windows,
        target: ShareTarget::default(),
    });
    app.tap(2, 1);

    let HandOff::Opened(url) = app.save_and_share(&sample_image()) else {
        panic!("expected hand-off");
    };
    let saved: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(saved.len(), 1);
    assert_eq!(
        url.as_str(),
        format!("instagram://library?LocalIdentifier={}", saved[0])
    );
    assert_eq!(*opener.opened.borrow(), vec![url.to_string()]);
}
