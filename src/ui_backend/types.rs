//! Shared UI types used by the backend and any frontend

use serde::{Deserialize, Serialize};

/// In-app navigation routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    Home,
    ConstraintTemplates,
    #[default]
    Constraints,
    Configurations,
    /// Shows the last load failure
    Error,
}

impl Route {
    /// Routes reachable from the header, in display order
    pub const NAVIGABLE: [Route; 4] = [
        Route::Home,
        Route::ConstraintTemplates,
        Route::Constraints,
        Route::Configurations,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::ConstraintTemplates => "/constrainttemplates",
            Self::Constraints => "/constraints",
            Self::Configurations => "/configurations",
            Self::Error => "/error",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::ConstraintTemplates => "Constraint Templates",
            Self::Constraints => "Constraints",
            Self::Configurations => "Configurations",
            Self::Error => "Error",
        }
    }

    /// Parse a path with an optional `#fragment`, e.g. `/constraints#psp`
    pub fn parse(location: &str) -> Option<(Route, Option<String>)> {
        let (path, fragment) = match location.split_once('#') {
            Some((path, fragment)) => (path, Some(fragment)),
            None => (location, None),
        };
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        let route = [
            Self::Home,
            Self::ConstraintTemplates,
            Self::Constraints,
            Self::Configurations,
            Self::Error,
        ]
        .into_iter()
        .find(|r| r.path() == path)?;
        let fragment = fragment.filter(|f| !f.is_empty()).map(str::to_string);
        Some((route, fragment))
    }
}

/// Currently focused UI component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedComponent {
    Sidebar,
    #[default]
    Content,
    Modal,
}

impl FocusedComponent {
    /// Toggle between sidebar and content
    pub fn next(self) -> Self {
        match self {
            Self::Sidebar => Self::Content,
            Self::Content => Self::Sidebar,
            Self::Modal => Self::Modal, // Modal keeps focus
        }
    }
}

/// Types of modals that can be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalType {
    Help,
    ContextPicker,
}

/// Available colour themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreset {
    #[default]
    CatppuccinMocha,
    Nord,
    Light,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Some((Route::Home, None)));
        assert_eq!(Route::parse(""), Some((Route::Home, None)));
        assert_eq!(
            Route::parse("/constraints/"),
            Some((Route::Constraints, None))
        );
        assert_eq!(
            Route::parse("/constraints#k8spsp-privileged"),
            Some((Route::Constraints, Some("k8spsp-privileged".to_string())))
        );
        assert_eq!(Route::parse("/constraints#"), Some((Route::Constraints, None)));
        assert_eq!(Route::parse("/nope"), None);
    }

    #[test]
    fn test_paths_round_trip() {
        for route in Route::NAVIGABLE {
            assert_eq!(Route::parse(route.path()).map(|(r, _)| r), Some(route));
        }
    }

    #[test]
    fn test_theme_preset_from_config_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            theme: ThemePreset,
        }
        let w: Wrapper = toml::from_str("theme = \"nord\"").unwrap();
        assert_eq!(w.theme, ThemePreset::Nord);
    }
}
