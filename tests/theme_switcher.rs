use restful_sounds_ui::{
    config::DEFAULT_STORAGE_KEY, theme::MemoryThemeHost, AppConfig, Theme, ThemeHost,
    ThemeManager,
};

fn theme_classes(host: &MemoryThemeHost) -> Vec<String> {
    host.root_classes()
        .into_iter()
        .filter(|class| Theme::CLASSES.contains(&class.as_str()))
        .collect()
}

#[test]
fn page_load_then_user_choice() {
    let host = MemoryThemeHost::new();
    let manager = ThemeManager::new(host.clone(), AppConfig::default().theme());

    assert_eq!(manager.init().ok(), Some(Theme::Auto));
    assert_eq!(manager.get_theme(), Theme::Auto);
    assert_eq!(theme_classes(&host), vec!["theme-auto"]);

    assert_eq!(manager.set_theme("dark").ok(), Some(Theme::Dark));
    assert_eq!(manager.get_theme(), Theme::Dark);
    assert_eq!(theme_classes(&host), vec!["theme-dark"]);
    assert_eq!(host.stored(DEFAULT_STORAGE_KEY), Some("dark".to_string()));
}

#[test]
fn rejected_name_leaves_state_unchanged() {
    let host = MemoryThemeHost::new().with_stored(DEFAULT_STORAGE_KEY, "light");
    let manager = ThemeManager::new(host.clone(), AppConfig::default().theme());
    manager.init().expect("init");

    assert!(manager.set_theme("neon").is_err());

    assert_eq!(manager.get_theme(), Theme::Light);
    assert_eq!(theme_classes(&host), vec!["theme-light"]);
}

#[test]
fn preference_survives_a_new_manager() {
    let host = MemoryThemeHost::new();
    {
        let manager = ThemeManager::new(host.clone(), AppConfig::default().theme());
        manager.init().expect("init");
        manager.set_theme("light").expect("valid theme");
    }

    let reloaded = ThemeManager::new(host.clone(), AppConfig::default().theme());
    assert_eq!(reloaded.init().ok(), Some(Theme::Light));
    assert_eq!(host.listener_count(), 1);
}

#[test]
fn system_changes_only_matter_in_auto() {
    let host = MemoryThemeHost::new();
    let manager = ThemeManager::new(host.clone(), AppConfig::default().theme());
    manager.init().expect("init");

    let before = host.appearance_queries();
    host.emit_color_scheme_change(true);
    host.emit_color_scheme_change(false);
    assert_eq!(host.appearance_queries(), before + 2);
    assert_eq!(theme_classes(&host), vec!["theme-auto"]);

    manager.set_theme("dark").expect("valid theme");
    let before = host.appearance_queries();
    host.emit_color_scheme_change(false);
    assert_eq!(host.appearance_queries(), before);
    assert_eq!(theme_classes(&host), vec!["theme-dark"]);
}

#[test]
fn runtime_override_moves_the_storage_key() {
    let config = AppConfig::default()
        .with_overrides_json(r#"{"storage_key": "rs-preview-theme"}"#)
        .expect("valid overrides");
    let host = MemoryThemeHost::new();
    let manager = ThemeManager::new(host.clone(), config.theme());

    manager.set_theme("dark").expect("valid theme");

    assert_eq!(host.stored("rs-preview-theme"), Some("dark".to_string()));
    assert_eq!(host.stored(DEFAULT_STORAGE_KEY), None);
}
