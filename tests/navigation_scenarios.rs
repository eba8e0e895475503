use neuroref::core::catalog::Region;
use neuroref::core::config::{CliOverrides, NeurorefConfig, ResolvedConfig, resolve_with_env};
use neuroref::core::content::ContentUnit;
use neuroref::core::i18n::Language;
use neuroref::core::navigation::{Navigator, SectionId, SubsectionId};
use neuroref::core::settings::{Settings, SettingsStore};
use neuroref::core::{Action, App, Effect, update};
use proptest::prelude::*;

// ============================================================================
// Helper Functions
// ============================================================================

fn test_app() -> App {
    App::new(SettingsStore::new(Settings::default(), None)).unwrap()
}

/// Resolved config with no env, pointing settings at `path`.
fn config_with_settings(path: std::path::PathBuf) -> ResolvedConfig {
    let mut resolved = resolve_with_env(&NeurorefConfig::default(), &CliOverrides::default(), |_| None);
    resolved.settings_path = Some(path);
    resolved
}

fn names<'a>(unit: &ContentUnit<'a>) -> Vec<&'a str> {
    match unit {
        ContentUnit::NerveList { nerves, .. } => nerves.iter().map(|&n| n.common_name.as_str()).collect(),
        other => panic!("expected a nerve list, got {}", other.kind()),
    }
}

// ============================================================================
// End-to-end flows
// ============================================================================

#[test]
fn test_upper_limb_list_contains_every_upper_limb_nerve() {
    let mut app = test_app();
    app.navigator
        .navigate_to_ids("nerves", Some("upper-limb-nerves"))
        .unwrap();

    let unit = app.content(None);
    let listed = names(&unit);
    for name in ["Nervio Mediano", "Nervio Ulnar", "Nervio Radial"] {
        assert!(listed.contains(&name), "{name} missing");
    }
    assert_eq!(listed.len(), app.catalog.get_by_region(Region::UpperLimb).len());
}

#[test]
fn test_cranial_list_keeps_catalog_order() {
    let mut app = test_app();
    app.navigator
        .navigate_to(SectionId::Nerves, Some(SubsectionId::CranialNerves))
        .unwrap();
    let unit = app.content(None);
    assert_eq!(
        names(&unit),
        vec!["Nervio Facial", "Nervio Trigémino", "Nervio Accesorio Espinal"]
    );
}

#[test]
fn test_query_ulnar_returns_only_ulnar() {
    let mut app = test_app();
    update(&mut app, Action::SetQuery("ulnar".to_string()));
    let ids: Vec<&str> = app.search.results().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["ulnar-wrist"]);
}

#[test]
fn test_query_ignores_accents_and_case() {
    let mut app = test_app();
    update(&mut app, Action::SetQuery("MEDIÁNO".to_string()));
    let plain: Vec<String> = app.search.results().iter().map(|n| n.id.clone()).collect();
    update(&mut app, Action::SetQuery("mediano".to_string()));
    let accented: Vec<String> = app.search.results().iter().map(|n| n.id.clone()).collect();
    assert_eq!(plain, accented);
    assert_eq!(plain, vec!["median-wrist".to_string()]);
}

#[test]
fn test_selecting_a_section_clears_the_subsection() {
    let mut app = test_app();
    update(
        &mut app,
        Action::Navigate(neuroref::core::navigation::parse_location("clinical-cases/carpal-tunnel").unwrap()),
    );
    assert_eq!(app.navigation().active_subsection, Some(SubsectionId::CarpalTunnel));

    update(&mut app, Action::SelectSection(SectionId::Reference));
    assert_eq!(app.navigation().active_section, Some(SectionId::Reference));
    assert_eq!(app.navigation().active_subsection, None);
}

#[test]
fn test_rejected_navigation_keeps_previous_state() {
    let mut app = test_app();
    update(&mut app, Action::SelectSection(SectionId::Nerves));
    let before = app.navigator.location();

    assert!(app.navigator.navigate_to_ids("nerves", Some("carpal-tunnel")).is_err());
    assert!(app.navigator.navigate_to_ids("bogus", None).is_err());
    assert_eq!(app.navigator.location(), before);
}

#[test]
fn test_toggles_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_settings(dir.path().join("settings.json"));

    let mut app = App::from_config(&config).unwrap();
    assert_eq!(update(&mut app, Action::ToggleTheme), Effect::PersistSettings);
    app.settings.persist().unwrap();
    assert_eq!(update(&mut app, Action::ToggleLanguage), Effect::PersistSettings);
    app.settings.persist().unwrap();

    let restarted = App::from_config(&config).unwrap();
    assert!(restarted.dark_mode());
    assert_eq!(restarted.language(), Language::En);
    assert_eq!(restarted.t("regions.upper-limb", &[]), "Upper limb");
}

#[test]
fn test_legacy_settings_file_is_read_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"isDarkMode": true, "language": "en"}"#).unwrap();

    let app = App::from_config(&config_with_settings(path)).unwrap();
    assert!(app.dark_mode());
    assert_eq!(app.language(), Language::En);
}

// ============================================================================
// Navigation invariant
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Section(usize),
    Subsection(Option<usize>),
    NavigateTo(usize, Option<usize>),
    Ids(String, Option<String>),
    Home,
}

fn op() -> impl Strategy<Value = Op> {
    let sections = SectionId::ALL.len();
    let subsections = SubsectionId::ALL.len();
    prop_oneof![
        (0..sections).prop_map(Op::Section),
        proptest::option::of(0..subsections).prop_map(Op::Subsection),
        (0..sections, proptest::option::of(0..subsections)).prop_map(|(s, sub)| Op::NavigateTo(s, sub)),
        ("[a-z-]{0,20}", proptest::option::of("[a-z-]{0,20}")).prop_map(|(s, sub)| Op::Ids(s, sub)),
        Just(Op::Home),
    ]
}

proptest! {
    #[test]
    fn navigation_state_is_always_consistent(ops in proptest::collection::vec(op(), 0..64)) {
        let mut nav = Navigator::default();
        for op in ops {
            let before = nav.location();
            let result = match op {
                Op::Section(i) => nav.set_active_section(SectionId::ALL[i]),
                Op::Subsection(i) => nav.set_active_subsection(i.map(|i| SubsectionId::ALL[i])),
                Op::NavigateTo(s, sub) => {
                    nav.navigate_to(SectionId::ALL[s], sub.map(|i| SubsectionId::ALL[i]))
                }
                Op::Ids(s, sub) => nav.navigate_to_ids(&s, sub.as_deref()),
                Op::Home => {
                    nav.go_home();
                    Ok(())
                }
            };
            prop_assert!(nav.state().is_consistent());
            if result.is_err() {
                prop_assert_eq!(nav.location(), before);
            }
        }
    }
}
