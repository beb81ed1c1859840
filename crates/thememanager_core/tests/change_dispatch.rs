use rusqlite::Connection;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use thememanager_core::db::open_db_in_memory;
use thememanager_core::{
    CatalogError, ChangeRequest, ChangeRequestHandler, ContentKind, Delivery, Locator,
    LocatorTarget, NotificationBus, Permission, SqliteThemeRepository, ThemeChangeDispatcher,
    ThemeItem, ThemeRecord, ThemeRepository,
};

/// Records every request it sees; optionally aborts or tags extras.
struct Recorder {
    id: &'static str,
    priority: i32,
    abort: bool,
    tag: Option<(&'static str, &'static str)>,
    seen: Mutex<Vec<ChangeRequest>>,
}

impl Recorder {
    fn new(id: &'static str, priority: i32) -> Self {
        Self {
            id,
            priority,
            abort: false,
            tag: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn aborting(mut self) -> Self {
        self.abort = true;
        self
    }

    fn tagging(mut self, key: &'static str, value: &'static str) -> Self {
        self.tag = Some((key, value));
        self
    }

    fn seen(&self) -> Vec<ChangeRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl ChangeRequestHandler for Recorder {
    fn handler_id(&self) -> &str {
        self.id
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn on_change_request(&self, request: &mut ChangeRequest, delivery: &mut Delivery) {
        self.seen.lock().unwrap().push(request.clone());
        if let Some((key, value)) = self.tag {
            request.extras.insert(key.to_string(), value.to_string());
        }
        if self.abort {
            delivery.abort();
        }
    }
}

/// Applies requested themes to the catalog it owns.
struct Applier {
    conn: Mutex<Connection>,
}

impl ChangeRequestHandler for Applier {
    fn handler_id(&self) -> &str {
        "applier"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn on_change_request(&self, request: &mut ChangeRequest, _delivery: &mut Delivery) {
        let Some(LocatorTarget::Item(key)) = request.locator.target() else {
            return;
        };
        let mut conn = self.conn.lock().unwrap();
        SqliteThemeRepository::new(&mut conn)
            .mark_applied_theme(&key.package_name, &key.theme_id)
            .unwrap();
    }
}

/// Panics on requests addressed to `theme_id`.
struct Faulty {
    theme_id: &'static str,
}

impl ChangeRequestHandler for Faulty {
    fn handler_id(&self) -> &str {
        "faulty"
    }

    fn priority(&self) -> i32 {
        100
    }

    fn on_change_request(&self, request: &mut ChangeRequest, _delivery: &mut Delivery) {
        if let Some(LocatorTarget::Item(key)) = request.locator.target() {
            if key.theme_id == self.theme_id {
                panic!("handler failed on {key}");
            }
        }
    }
}

fn locator(package_name: &str, theme_id: &str) -> Locator {
    Locator::parse(&format!(
        "content://com.tmobile.thememanager.themes/theme/{package_name}/{theme_id}"
    ))
    .unwrap()
}

fn granted() -> [Permission; 1] {
    [Permission::ChangeConfiguration]
}

#[test]
fn handlers_run_in_descending_priority_order() {
    let low = Arc::new(Recorder::new("low", -10));
    let high = Arc::new(Recorder::new("high", 100));
    let mid = Arc::new(Recorder::new("mid", 5));
    let mut bus = NotificationBus::new();
    bus.register(low.clone()).unwrap();
    bus.register(high.clone()).unwrap();
    bus.register(mid.clone()).unwrap();

    let dispatcher = ThemeChangeDispatcher::new(&bus, granted());
    let receipt = dispatcher
        .request_theme_change(&locator("pkgA", "t1"))
        .unwrap();
    assert_eq!(bus.pending_count(), 1);
    assert!(low.seen().is_empty());

    let reports = bus.deliver_pending().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].request_id, receipt.request_id);
    assert_eq!(reports[0].invoked, ["high", "mid", "low"]);
    assert_eq!(reports[0].aborted_by, None);
    assert_eq!(low.seen().len(), 1);
}

#[test]
fn abort_stops_lower_priority_handlers() {
    let gate = Arc::new(Recorder::new("gate", 50).aborting());
    let after = Arc::new(Recorder::new("after", 0));
    let mut bus = NotificationBus::new();
    bus.register(after.clone()).unwrap();
    bus.register(gate.clone()).unwrap();

    ThemeChangeDispatcher::new(&bus, granted())
        .request_theme_change(&locator("pkgA", "t1"))
        .unwrap();
    let reports = bus.deliver_pending().unwrap();

    assert_eq!(reports[0].invoked, ["gate"]);
    assert_eq!(reports[0].aborted_by.as_deref(), Some("gate"));
    assert_eq!(gate.seen().len(), 1);
    assert!(after.seen().is_empty());
}

#[test]
fn rewritten_extras_reach_later_handlers() {
    let first = Arc::new(Recorder::new("first", 10).tagging("apply_wallpaper", "false"));
    let second = Arc::new(Recorder::new("second", 1));
    let mut bus = NotificationBus::new();
    bus.register(first.clone()).unwrap();
    bus.register(second.clone()).unwrap();

    let request = ChangeRequest::theme(locator("pkgA", "t1")).with_extra("origin", "settings");
    ThemeChangeDispatcher::new(&bus, granted())
        .request_custom_change(request)
        .unwrap();
    let reports = bus.deliver_pending().unwrap();

    let seen_first = first.seen();
    assert_eq!(seen_first[0].extras.len(), 1);
    let seen_second = second.seen();
    assert_eq!(
        seen_second[0].extras.get("apply_wallpaper").map(String::as_str),
        Some("false")
    );
    assert_eq!(
        seen_second[0].extras.get("origin").map(String::as_str),
        Some("settings")
    );
    assert_eq!(reports[0].request.extras.len(), 2);
}

#[test]
fn requests_are_delivered_in_fifo_order() {
    let recorder = Arc::new(Recorder::new("recorder", 0));
    let mut bus = NotificationBus::new();
    bus.register(recorder.clone()).unwrap();
    let dispatcher = ThemeChangeDispatcher::new(&bus, granted());

    let first = dispatcher
        .request_theme_change(&locator("pkgA", "t1"))
        .unwrap();
    let second = dispatcher
        .request_style_change(&locator("pkgB", "t2"))
        .unwrap();
    assert_ne!(first.request_id, second.request_id);

    let reports = bus.deliver_pending().unwrap();
    let ids: Vec<_> = reports.iter().map(|report| report.request_id).collect();
    assert_eq!(ids, [first.request_id, second.request_id]);
    assert!(bus.deliver_pending().unwrap().is_empty());
}

#[test]
fn style_request_is_tagged_as_style_item() {
    let recorder = Arc::new(Recorder::new("recorder", 0));
    let mut bus = NotificationBus::new();
    bus.register(recorder.clone()).unwrap();

    ThemeChangeDispatcher::new(&bus, granted())
        .request_style_change(&locator("pkgA", "t1"))
        .unwrap();
    bus.deliver_pending().unwrap();

    let seen = recorder.seen();
    assert_eq!(seen[0].content_kind, Some(ContentKind::StyleItem));
    assert!(seen[0].is_style_only());
    assert_eq!(seen[0].action, "com.tmobile.intent.action.CHANGE_THEME");
    assert_eq!(seen[0].locator, locator("pkgA", "t1"));
}

#[test]
fn sender_without_permission_is_denied() {
    let recorder = Arc::new(Recorder::new("recorder", 0));
    let mut bus = NotificationBus::new();
    bus.register(recorder.clone()).unwrap();

    let dispatcher = ThemeChangeDispatcher::new(&bus, []);
    let err = dispatcher
        .request_style_change(&locator("pkgA", "t1"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::PermissionDenied { .. }));

    assert!(bus.deliver_pending().unwrap().is_empty());
    assert!(recorder.seen().is_empty());
}

#[test]
fn closed_bus_reports_channel_unavailable() {
    let bus = NotificationBus::new();
    bus.shutdown();

    let err = ThemeChangeDispatcher::new(&bus, granted())
        .request_theme_change(&locator("pkgA", "t1"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::ChannelUnavailable));
}

#[test]
fn custom_request_with_foreign_action_is_rejected() {
    let bus = NotificationBus::new();
    let mut request = ChangeRequest::theme(locator("pkgA", "t1"));
    request.action = "com.example.OTHER".to_string();

    let err = ThemeChangeDispatcher::new(&bus, granted())
        .request_custom_change(request)
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument(_)));
    assert_eq!(bus.pending_count(), 0);
}

#[test]
fn applying_handler_updates_the_catalog() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut repo = SqliteThemeRepository::new(&mut conn);
        let mut current = ThemeRecord::new("pkgB", "t2", "Forest");
        current.is_applied = true;
        repo.insert_theme(&current).unwrap();
        repo.insert_theme(&ThemeRecord::new("pkgA", "t1", "Ocean"))
            .unwrap();
    }
    let applier = Arc::new(Applier {
        conn: Mutex::new(conn),
    });
    let mut bus = NotificationBus::new();
    bus.register(applier.clone()).unwrap();

    ThemeChangeDispatcher::new(&bus, granted())
        .request_theme_change(&locator("pkgA", "t1"))
        .unwrap();

    let mut conn = applier.conn.lock().unwrap();
    {
        let repo = SqliteThemeRepository::new(&mut conn);
        let applied = ThemeItem::from_result(Some(repo.get_applied_theme().unwrap()))
            .unwrap()
            .unwrap();
        assert!(applied.equals_descriptor("pkgB", "t2").unwrap());
    }
    drop(conn);

    let reports = bus.deliver_pending().unwrap();
    assert_eq!(reports[0].invoked, ["applier"]);

    let mut conn = applier.conn.lock().unwrap();
    let repo = SqliteThemeRepository::new(&mut conn);
    let applied = ThemeItem::from_result(Some(repo.get_applied_theme().unwrap()))
        .unwrap()
        .unwrap();
    assert_eq!(applied.count().unwrap(), 1);
    assert!(applied.equals_descriptor("pkgA", "t1").unwrap());
}

#[test]
fn handler_panic_keeps_later_requests_queued() {
    let recorder = Arc::new(Recorder::new("recorder", 0));
    let mut bus = NotificationBus::new();
    bus.register(Arc::new(Faulty { theme_id: "broken" })).unwrap();
    bus.register(recorder.clone()).unwrap();

    let dispatcher = ThemeChangeDispatcher::new(&bus, granted());
    dispatcher
        .request_theme_change(&locator("pkgA", "t1"))
        .unwrap();
    dispatcher
        .request_theme_change(&locator("pkgA", "broken"))
        .unwrap();
    let last = dispatcher
        .request_theme_change(&locator("pkgA", "t3"))
        .unwrap();

    assert!(catch_unwind(AssertUnwindSafe(|| bus.deliver_pending())).is_err());
    assert_eq!(recorder.seen().len(), 1);
    assert_eq!(bus.pending_count(), 1);

    let reports = bus.deliver_pending().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].request_id, last.request_id);
    assert_eq!(reports[0].invoked, ["faulty", "recorder"]);
    assert_eq!(recorder.seen().len(), 2);
}

#[test]
fn host_reported_permission_strings_gate_dispatch() {
    let bus = NotificationBus::new();

    let allowed = ThemeChangeDispatcher::from_granted_strings(
        &bus,
        &[
            "android.permission.INTERNET",
            " android.permission.CHANGE_CONFIGURATION ",
        ],
    )
    .unwrap();
    allowed
        .request_theme_change(&locator("pkgA", "t1"))
        .unwrap();
    assert_eq!(bus.pending_count(), 1);

    let unrelated =
        ThemeChangeDispatcher::from_granted_strings(&bus, &["android.permission.INTERNET"])
            .unwrap();
    let err = unrelated
        .request_theme_change(&locator("pkgA", "t1"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::PermissionDenied { .. }));
    assert_eq!(bus.pending_count(), 1);

    let err = ThemeChangeDispatcher::from_granted_strings(&bus, &["  "])
        .err()
        .unwrap();
    assert!(matches!(err, CatalogError::InvalidArgument(_)));
}
