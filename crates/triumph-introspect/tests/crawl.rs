//! End-to-end crawls against an in-memory bus.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use triumph_core::{
    BusSessionPort, BusValue, ComponentFilter, CrawlSettings, FilteredMember, RegistrationStatus,
    ServiceKind, SessionError, from_value,
};
use triumph_introspect::{CrawlError, inspect_off_thread, inspect_service};

const ROOT: &str = r#"<!DOCTYPE node PUBLIC "-//freedesktop//DTD D-BUS Object Introspection 1.0//EN"
 "http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd">
<node>
  <node name="About"/>
  <node name="lamp"/>
</node>"#;

const ABOUT: &str = r#"<node>
  <interface name="org.alljoyn.About">
    <property name="Version" type="q" access="read"/>
    <method name="GetAboutData">
      <arg name="languageTag" type="s" direction="in"/>
      <arg name="aboutData" type="a{sv}" direction="out"/>
    </method>
    <signal name="Announce">
      <arg name="version" type="q"/>
      <arg name="objectDescription" type="a(oas)"/>
    </signal>
  </interface>
</node>"#;

const LAMP: &str = r#"<node>
  <interface name="org.example.Lamp">
    <annotation name="org.alljoyn.Bus.Secure" value="true"/>
    <property name="Brightness" type="u" access="readwrite"/>
    <method name="SetColor">
      <arg name="rgb" type="(yyy)"/>
      <annotation name="org.freedesktop.DBus.Method.NoReply" value="true"/>
    </method>
  </interface>
  <node name="bulb0"/>
  <node name="/lamp"/>
</node>"#;

const BULB: &str = r#"<node>
  <interface name="org.example.Bulb">
    <method name="Toggle"/>
  </interface>
  <node name="/"/>
</node>"#;

/// In-memory bus that remembers which interfaces it has registered.
#[derive(Default)]
struct MemoryBus {
    objects: HashMap<String, String>,
    known: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    cancel_after: Option<(usize, Arc<AtomicBool>)>,
}

impl MemoryBus {
    fn lamp_service() -> Self {
        let mut bus = Self::default();
        for (path, doc) in [
            ("/", ROOT),
            ("/About", ABOUT),
            ("/lamp", LAMP),
            ("/lamp/bulb0", BULB),
        ] {
            bus.objects.insert(path.to_string(), doc.to_string());
        }
        bus
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl BusSessionPort for MemoryBus {
    fn introspect(&self, object_path: &str) -> Result<String, SessionError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(object_path.to_string());
        if let Some((limit, flag)) = &self.cancel_after {
            if calls.len() >= *limit {
                flag.store(true, Ordering::Relaxed);
            }
        }
        self.objects
            .get(object_path)
            .cloned()
            .ok_or_else(|| SessionError::new("ErUnknownObject"))
    }

    fn register_interfaces(
        &self,
        _object_path: &str,
        _document: &str,
        interfaces: &[String],
    ) -> RegistrationStatus {
        let mut known = self.known.lock().unwrap();
        let mut fresh = false;
        for name in interfaces {
            fresh |= known.insert(name.clone());
        }
        if fresh {
            RegistrationStatus::Registered
        } else {
            RegistrationStatus::AlreadyExists
        }
    }
}

#[test]
fn crawl_builds_full_graph() {
    let bus = MemoryBus::lamp_service();
    let service = inspect_service(
        &bus,
        "org.example.lamp",
        ServiceKind::Remote,
        &CrawlSettings::with_defaults(),
    )
    .unwrap();

    let paths: Vec<_> = service.objects().iter().map(|o| o.path()).collect();
    assert_eq!(paths, vec!["/About", "/lamp", "/lamp/bulb0"]);
    // Self and root back-references are visited only once.
    assert_eq!(bus.calls(), vec!["/", "/About", "/lamp", "/lamp/bulb0"]);

    let about = service.interface("/About", "org.alljoyn.About").unwrap();
    assert!(!about.is_secure());
    let get = about.method("GetAboutData").unwrap();
    assert_eq!(get.input_signature(), "s");
    assert_eq!(get.output_signature(), "a{sv}");
    assert_eq!(get.outputs()[0].label(), "{ string => variant } aboutData");
    let announce = about.signal("Announce").unwrap();
    assert_eq!(announce.output_signature(), "qa(oas)");

    let lamp = service.interface("/lamp", "org.example.Lamp").unwrap();
    assert!(lamp.is_secure());
    assert!(lamp.method("SetColor").unwrap().is_no_reply());
    let brightness = service
        .property("/lamp", "org.example.Lamp", "Brightness")
        .unwrap();
    assert!(brightness.is_readable() && brightness.is_writable());
    assert_eq!(
        brightness.qualified_name().to_string(),
        "org.example.lamp:/lamp org.example.Lamp.Brightness"
    );

    assert_eq!(service.object("/lamp").unwrap().children(), ["/lamp/bulb0"]);
}

#[test]
fn filter_over_crawled_service() {
    let bus = MemoryBus::lamp_service();
    let service = inspect_service(
        &bus,
        "org.example.lamp",
        ServiceKind::Remote,
        &CrawlSettings::with_defaults(),
    )
    .unwrap();

    let mut filter = ComponentFilter::new().with_name("  SET");
    filter.show_properties = false;
    let selected = filter.apply(&service);
    let names: Vec<_> = selected.iter().map(FilteredMember::name).collect();
    assert_eq!(names, vec!["SetColor"]);

    let filter = ComponentFilter::new().with_interface("org.example.Bulb");
    assert_eq!(filter.apply(&service).len(), 1);
}

#[test]
fn crawled_arguments_accept_values() {
    let bus = MemoryBus::lamp_service();
    let service = inspect_service(
        &bus,
        "org.example.lamp",
        ServiceKind::Remote,
        &CrawlSettings::with_defaults(),
    )
    .unwrap();

    let set_color = service
        .member("/lamp", "org.example.Lamp", "SetColor")
        .unwrap();
    let mut rgb = set_color.inputs()[0].clone();
    rgb.set_value(BusValue::Struct(vec![
        BusValue::Byte(255),
        BusValue::Byte(128),
        BusValue::Byte(0),
    ]))
    .unwrap();
    assert!(rgb.is_complete());
    assert!(rgb.set_value(BusValue::Int32(1)).is_err());

    let reply = from_value("rgb", "(yyy)", rgb.value().unwrap()).unwrap();
    assert_eq!(reply.signature(), "(yyy)");
}

#[test]
fn missing_object_aborts_crawl() {
    let mut bus = MemoryBus::lamp_service();
    bus.objects.remove("/lamp/bulb0");
    let err = inspect_service(
        &bus,
        "org.example.lamp",
        ServiceKind::Remote,
        &CrawlSettings::with_defaults(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CrawlError::IntrospectionFailed { ref path, ref reason }
            if path == "/lamp/bulb0" && reason == "ErUnknownObject"
    ));
    assert!(err.user_message().starts_with("This service could not be inspected"));
}

#[test]
fn excluded_subtree_is_skipped() {
    let bus = MemoryBus::lamp_service();
    let settings = CrawlSettings {
        excluded_paths: vec!["/lamp".to_string()],
        ..CrawlSettings::with_defaults()
    };
    let service = inspect_service(&bus, "org.example.lamp", ServiceKind::Remote, &settings).unwrap();
    assert_eq!(service.objects().len(), 1);
    assert_eq!(bus.calls(), vec!["/", "/About"]);
}

#[test]
fn repeated_registration_is_not_fatal() {
    let bus = MemoryBus::lamp_service();
    let settings = CrawlSettings::with_defaults();
    inspect_service(&bus, "org.example.lamp", ServiceKind::Remote, &settings).unwrap();
    // Every interface is already known the second time round.
    let again = inspect_service(&bus, "org.example.lamp", ServiceKind::Remote, &settings).unwrap();
    assert_eq!(again.objects().len(), 3);
}

#[test]
fn cancellation_mid_crawl() {
    let flag = Arc::new(AtomicBool::new(false));
    let mut bus = MemoryBus::lamp_service();
    bus.cancel_after = Some((2, Arc::clone(&flag)));
    let settings = CrawlSettings::with_defaults();

    let mut crawler = triumph_introspect::Crawler::new(&bus, &settings).with_cancellation(flag);
    let err = crawler.crawl().unwrap_err();
    assert!(matches!(err, CrawlError::Cancelled));
    assert_eq!(bus.calls(), vec!["/", "/About"]);
}

#[tokio::test]
async fn off_thread_inspection() {
    let bus: Arc<dyn BusSessionPort> = Arc::new(MemoryBus::lamp_service());
    let service = inspect_off_thread(
        bus,
        "org.example.lamp".to_string(),
        ServiceKind::Local,
        CrawlSettings::with_defaults(),
        None,
    )
    .await
    .unwrap();
    assert_eq!(service.kind(), ServiceKind::Local);
    assert_eq!(service.objects().len(), 3);
}

#[tokio::test]
async fn off_thread_cancelled_before_start() {
    let bus: Arc<dyn BusSessionPort> = Arc::new(MemoryBus::lamp_service());
    let err = inspect_off_thread(
        bus,
        "org.example.lamp".to_string(),
        ServiceKind::Remote,
        CrawlSettings::with_defaults(),
        Some(Arc::new(AtomicBool::new(true))),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CrawlError::Cancelled));
}
