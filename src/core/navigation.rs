//! # Navigation
//!
//! The section tree and the active `(section, subsection)` pair.
//!
//! ```text
//! Navigator
//! ├── state: NavigationState
//! │   ├── sections: Vec<Section>          // the menu, in display order
//! │   ├── active_section: Option<SectionId>
//! │   └── active_subsection: Option<SubsectionId>
//! └── subscribers: Subscribers<NavigationState>
//! ```
//!
//! Invariant: `active_subsection` is `None` whenever `active_section` is
//! `None`, and otherwise belongs to the active section's subsection list.
//! Every mutator either keeps the invariant or returns an error and leaves
//! the state untouched.
//!
//! Locations are addressed as `#section/subsection` strings (`#` alone is
//! the welcome screen), which is what `--location` accepts on the CLI.

use std::fmt;

use log::debug;

use crate::core::catalog::Region;
use crate::core::error::{CoreError, Result};
use crate::core::notify::{SubscriberId, Subscribers};

// ============================================================================
// Identifiers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Nerves,
    NerveConduction,
    EmgTechniques,
    SpecialStudies,
    Pathologies,
    ClinicalCases,
    Reference,
}

impl SectionId {
    pub const ALL: [SectionId; 7] = [
        SectionId::Nerves,
        SectionId::NerveConduction,
        SectionId::EmgTechniques,
        SectionId::SpecialStudies,
        SectionId::Pathologies,
        SectionId::ClinicalCases,
        SectionId::Reference,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Nerves => "nerves",
            SectionId::NerveConduction => "nerve-conduction",
            SectionId::EmgTechniques => "emg-techniques",
            SectionId::SpecialStudies => "special-studies",
            SectionId::Pathologies => "pathologies",
            SectionId::ClinicalCases => "clinical-cases",
            SectionId::Reference => "reference",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == id)
    }

    pub fn label_key(self) -> String {
        format!("sections.{}", self.as_str())
    }

    /// One-line description shown on the welcome screen and section overview.
    pub fn feature_key(self) -> &'static str {
        match self {
            SectionId::Nerves => "features.nerves",
            SectionId::NerveConduction => "features.nerveConduction",
            SectionId::EmgTechniques => "features.emgTechniques",
            SectionId::SpecialStudies => "features.specialStudies",
            SectionId::Pathologies => "features.pathologies",
            SectionId::ClinicalCases => "features.clinicalCases",
            SectionId::Reference => "features.references",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsectionId {
    UpperLimbNerves,
    LowerLimbNerves,
    CranialNerves,
    UpperLimbMotor,
    UpperLimbSensory,
    LowerLimbMotor,
    LowerLimbSensory,
    EmgBasics,
    SpontaneousActivity,
    MotorUnitPotentials,
    InterferencePattern,
    FWaves,
    HReflex,
    RepetitiveStimulation,
    Neuropathies,
    Myopathies,
    NeuromuscularJunction,
    MotorNeuron,
    CarpalTunnel,
    Radiculopathies,
    Polyneuropathies,
    Guidelines,
    Articles,
    Books,
}

impl SubsectionId {
    pub const ALL: [SubsectionId; 24] = [
        SubsectionId::UpperLimbNerves,
        SubsectionId::LowerLimbNerves,
        SubsectionId::CranialNerves,
        SubsectionId::UpperLimbMotor,
        SubsectionId::UpperLimbSensory,
        SubsectionId::LowerLimbMotor,
        SubsectionId::LowerLimbSensory,
        SubsectionId::EmgBasics,
        SubsectionId::SpontaneousActivity,
        SubsectionId::MotorUnitPotentials,
        SubsectionId::InterferencePattern,
        SubsectionId::FWaves,
        SubsectionId::HReflex,
        SubsectionId::RepetitiveStimulation,
        SubsectionId::Neuropathies,
        SubsectionId::Myopathies,
        SubsectionId::NeuromuscularJunction,
        SubsectionId::MotorNeuron,
        SubsectionId::CarpalTunnel,
        SubsectionId::Radiculopathies,
        SubsectionId::Polyneuropathies,
        SubsectionId::Guidelines,
        SubsectionId::Articles,
        SubsectionId::Books,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubsectionId::UpperLimbNerves => "upper-limb-nerves",
            SubsectionId::LowerLimbNerves => "lower-limb-nerves",
            SubsectionId::CranialNerves => "cranial-nerves",
            SubsectionId::UpperLimbMotor => "upper-limb-motor",
            SubsectionId::UpperLimbSensory => "upper-limb-sensory",
            SubsectionId::LowerLimbMotor => "lower-limb-motor",
            SubsectionId::LowerLimbSensory => "lower-limb-sensory",
            SubsectionId::EmgBasics => "emg-basics",
            SubsectionId::SpontaneousActivity => "spontaneous-activity",
            SubsectionId::MotorUnitPotentials => "motor-unit-potentials",
            SubsectionId::InterferencePattern => "interference-pattern",
            SubsectionId::FWaves => "f-waves",
            SubsectionId::HReflex => "h-reflex",
            SubsectionId::RepetitiveStimulation => "repetitive-stimulation",
            SubsectionId::Neuropathies => "neuropathies",
            SubsectionId::Myopathies => "myopathies",
            SubsectionId::NeuromuscularJunction => "neuromuscular-junction",
            SubsectionId::MotorNeuron => "motor-neuron",
            SubsectionId::CarpalTunnel => "carpal-tunnel",
            SubsectionId::Radiculopathies => "radiculopathies",
            SubsectionId::Polyneuropathies => "polyneuropathies",
            SubsectionId::Guidelines => "guidelines",
            SubsectionId::Articles => "articles",
            SubsectionId::Books => "books",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == id)
    }

    pub fn label_key(self) -> String {
        format!("subsections.{}", self.as_str())
    }

    /// The section this subsection is filed under in the canonical menu.
    pub fn parent(self) -> SectionId {
        use SubsectionId::*;
        match self {
            UpperLimbNerves | LowerLimbNerves | CranialNerves => SectionId::Nerves,
            UpperLimbMotor | UpperLimbSensory | LowerLimbMotor | LowerLimbSensory => {
                SectionId::NerveConduction
            }
            EmgBasics | SpontaneousActivity | MotorUnitPotentials | InterferencePattern => {
                SectionId::EmgTechniques
            }
            FWaves | HReflex | RepetitiveStimulation => SectionId::SpecialStudies,
            Neuropathies | Myopathies | NeuromuscularJunction | MotorNeuron => {
                SectionId::Pathologies
            }
            CarpalTunnel | Radiculopathies | Polyneuropathies => SectionId::ClinicalCases,
            Guidelines | Articles | Books => SectionId::Reference,
        }
    }

    /// Catalog partition listed by a `nerves` subsection.
    pub fn region(self) -> Option<Region> {
        match self {
            SubsectionId::UpperLimbNerves => Some(Region::UpperLimb),
            SubsectionId::LowerLimbNerves => Some(Region::LowerLimb),
            SubsectionId::CranialNerves => Some(Region::Cranial),
            _ => None,
        }
    }

    /// Inverse of [`SubsectionId::region`].
    pub fn for_region(region: Region) -> Self {
        match region {
            Region::UpperLimb => SubsectionId::UpperLimbNerves,
            Region::LowerLimb => SubsectionId::LowerLimbNerves,
            Region::Cranial => SubsectionId::CranialNerves,
        }
    }
}

impl fmt::Display for SubsectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Menu
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub subsections: Vec<SubsectionId>,
}

impl Section {
    pub fn contains(&self, subsection: SubsectionId) -> bool {
        self.subsections.contains(&subsection)
    }
}

/// The canonical menu: every section in display order with its subsections.
pub fn menu() -> Vec<Section> {
    SectionId::ALL
        .into_iter()
        .map(|id| Section {
            id,
            subsections: SubsectionId::ALL
                .into_iter()
                .filter(|sub| sub.parent() == id)
                .collect(),
        })
        .collect()
}

/// Startup check: no section repeats, none is empty, and each subsection is
/// filed under its own parent exactly once.
pub fn verify_menu(sections: &[Section]) -> Result<()> {
    let mut seen_sections = Vec::new();
    let mut seen_subsections = Vec::new();
    for section in sections {
        if seen_sections.contains(&section.id) {
            return Err(CoreError::DatasetIntegrity(format!(
                "section '{}' appears twice in the menu",
                section.id
            )));
        }
        seen_sections.push(section.id);

        if section.subsections.is_empty() {
            return Err(CoreError::DatasetIntegrity(format!(
                "section '{}' has no subsections",
                section.id
            )));
        }
        for sub in &section.subsections {
            if sub.parent() != section.id {
                return Err(CoreError::DatasetIntegrity(format!(
                    "subsection '{}' is filed under '{}' but belongs to '{}'",
                    sub,
                    section.id,
                    sub.parent()
                )));
            }
            if seen_subsections.contains(sub) {
                return Err(CoreError::DatasetIntegrity(format!(
                    "subsection '{sub}' appears twice in the menu"
                )));
            }
            seen_subsections.push(*sub);
        }
    }
    Ok(())
}

// ============================================================================
// Locations
// ============================================================================

/// A parsed `#section/subsection` address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub section: Option<SectionId>,
    pub subsection: Option<SubsectionId>,
}

impl Location {
    pub const HOME: Location = Location {
        section: None,
        subsection: None,
    };
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.section, self.subsection) {
            (None, _) => f.write_str("#"),
            (Some(section), None) => write!(f, "#{section}"),
            (Some(section), Some(sub)) => write!(f, "#{section}/{sub}"),
        }
    }
}

/// Parse `"#nerves/upper-limb-nerves"`, `"nerves"`, `"#"` or `""`.
///
/// Unknown section tags are `UnknownSection`; unknown or foreign subsection
/// ids are `InvalidSubsection`.
pub fn parse_location(raw: &str) -> Result<Location> {
    let trimmed = raw.trim().trim_start_matches('#').trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Location::HOME);
    }

    let (section_raw, sub_raw) = match trimmed.split_once('/') {
        Some((s, sub)) => (s, Some(sub)),
        None => (trimmed, None),
    };
    let section =
        SectionId::parse(section_raw).ok_or_else(|| CoreError::UnknownSection(section_raw.into()))?;
    let subsection = match sub_raw {
        None => None,
        Some(sub_raw) => match SubsectionId::parse(sub_raw) {
            Some(sub) if sub.parent() == section => Some(sub),
            _ => {
                return Err(CoreError::InvalidSubsection {
                    section: section.to_string(),
                    subsection: sub_raw.to_string(),
                });
            }
        },
    };
    Ok(Location {
        section: Some(section),
        subsection,
    })
}

// ============================================================================
// State + store
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub sections: Vec<Section>,
    pub active_section: Option<SectionId>,
    pub active_subsection: Option<SubsectionId>,
}

impl NavigationState {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            active_section: None,
            active_subsection: None,
        }
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn location(&self) -> Location {
        Location {
            section: self.active_section,
            subsection: self.active_subsection,
        }
    }

    pub fn is_home(&self) -> bool {
        self.active_section.is_none()
    }

    /// Check the structural invariant against this state's own menu.
    pub fn is_consistent(&self) -> bool {
        match (self.active_section, self.active_subsection) {
            (None, None) => true,
            (None, Some(_)) => false,
            (Some(section), sub) => match self.section(section) {
                None => false,
                Some(s) => sub.is_none_or(|sub| s.contains(sub)),
            },
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(menu())
    }
}

/// Owner of the navigation state. All transitions go through here.
#[derive(Debug, Default)]
pub struct Navigator {
    state: NavigationState,
    subscribers: Subscribers<NavigationState>,
}

impl Navigator {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            state: NavigationState::new(sections),
            subscribers: Subscribers::new(),
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn location(&self) -> Location {
        self.state.location()
    }

    /// Activate `section` and clear the subsection.
    pub fn set_active_section(&mut self, section: SectionId) -> Result<()> {
        self.require_section(section)?;
        self.commit(Some(section), None);
        Ok(())
    }

    /// Set or clear the subsection within the current section.
    pub fn set_active_subsection(&mut self, subsection: Option<SubsectionId>) -> Result<()> {
        if let Some(sub) = subsection {
            let section = self.state.active_section;
            let belongs = section
                .and_then(|id| self.state.section(id))
                .is_some_and(|s| s.contains(sub));
            if !belongs {
                return Err(CoreError::InvalidSubsection {
                    section: section.map_or_else(|| "none".to_string(), |s| s.to_string()),
                    subsection: sub.to_string(),
                });
            }
        }
        self.commit(self.state.active_section, subsection);
        Ok(())
    }

    /// Atomic compound transition. Preferred over the two setters.
    pub fn navigate_to(&mut self, section: SectionId, subsection: Option<SubsectionId>) -> Result<()> {
        let entry = self.require_section(section)?;
        if let Some(sub) = subsection
            && !entry.contains(sub)
        {
            return Err(CoreError::InvalidSubsection {
                section: section.to_string(),
                subsection: sub.to_string(),
            });
        }
        self.commit(Some(section), subsection);
        Ok(())
    }

    /// `navigate_to` for raw string ids.
    pub fn navigate_to_ids(&mut self, section: &str, subsection: Option<&str>) -> Result<()> {
        let section_id =
            SectionId::parse(section).ok_or_else(|| CoreError::InvalidSection(section.to_string()))?;
        let sub_id = match subsection {
            None => None,
            Some(raw) => Some(SubsectionId::parse(raw).ok_or_else(|| {
                CoreError::InvalidSubsection {
                    section: section.to_string(),
                    subsection: raw.to_string(),
                }
            })?),
        };
        self.navigate_to(section_id, sub_id)
    }

    /// Jump to a parsed or raw `#section/subsection` address.
    pub fn navigate_to_location(&mut self, location: Location) -> Result<()> {
        match location.section {
            None => {
                self.go_home();
                Ok(())
            }
            Some(section) => self.navigate_to(section, location.subsection),
        }
    }

    pub fn go_home(&mut self) {
        self.commit(None, None);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&NavigationState) + 'static) -> SubscriberId {
        self.subscribers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    fn require_section(&self, section: SectionId) -> Result<&Section> {
        self.state
            .section(section)
            .ok_or_else(|| CoreError::InvalidSection(section.to_string()))
    }

    fn commit(&mut self, section: Option<SectionId>, subsection: Option<SubsectionId>) {
        self.state.active_section = section;
        self.state.active_subsection = subsection;
        debug!("Navigated to {}", self.state.location());
        self.subscribers.notify(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_menu_matches_canonical_order() {
        let sections = menu();
        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "nerves",
                "nerve-conduction",
                "emg-techniques",
                "special-studies",
                "pathologies",
                "clinical-cases",
                "reference"
            ]
        );
        let nerves: Vec<&str> = sections[0].subsections.iter().map(|s| s.as_str()).collect();
        assert_eq!(nerves, vec!["upper-limb-nerves", "lower-limb-nerves", "cranial-nerves"]);
        assert_eq!(sections[1].subsections.len(), 4);
        assert_eq!(sections[6].subsections, vec![
            SubsectionId::Guidelines,
            SubsectionId::Articles,
            SubsectionId::Books
        ]);
    }

    #[test]
    fn test_canonical_menu_verifies() {
        assert!(verify_menu(&menu()).is_ok());
    }

    #[test]
    fn test_verify_menu_rejects_foreign_subsection() {
        let mut sections = menu();
        sections[0].subsections.push(SubsectionId::Books);
        let err = verify_menu(&sections).unwrap_err();
        assert!(matches!(err, CoreError::DatasetIntegrity(msg) if msg.contains("books")));
    }

    #[test]
    fn test_verify_menu_rejects_empty_section() {
        let mut sections = menu();
        sections[3].subsections.clear();
        assert!(verify_menu(&sections).is_err());
    }

    #[test]
    fn test_initial_state_is_home() {
        let nav = Navigator::default();
        assert!(nav.state().is_home());
        assert_eq!(nav.state().active_subsection, None);
        assert_eq!(nav.location().to_string(), "#");
    }

    #[test]
    fn test_set_active_section_clears_subsection() {
        let mut nav = Navigator::default();
        nav.navigate_to(SectionId::ClinicalCases, Some(SubsectionId::CarpalTunnel))
            .unwrap();
        nav.set_active_section(SectionId::Reference).unwrap();
        assert_eq!(nav.state().active_section, Some(SectionId::Reference));
        assert_eq!(nav.state().active_subsection, None);
    }

    #[test]
    fn test_set_active_subsection_validates_parent() {
        let mut nav = Navigator::default();
        nav.set_active_section(SectionId::Nerves).unwrap();

        let err = nav
            .set_active_subsection(Some(SubsectionId::EmgBasics))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSubsection { .. }));
        assert_eq!(nav.state().active_subsection, None);

        nav.set_active_subsection(Some(SubsectionId::CranialNerves)).unwrap();
        assert_eq!(nav.state().active_subsection, Some(SubsectionId::CranialNerves));

        nav.set_active_subsection(None).unwrap();
        assert_eq!(nav.state().active_subsection, None);
        assert_eq!(nav.state().active_section, Some(SectionId::Nerves));
    }

    #[test]
    fn test_set_active_subsection_without_section_fails() {
        let mut nav = Navigator::default();
        let err = nav
            .set_active_subsection(Some(SubsectionId::Books))
            .unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidSubsection { section, .. } if section == "none")
        );
        assert!(nav.state().is_home());
    }

    #[test]
    fn test_navigate_to_rejects_foreign_pair_atomically() {
        let mut nav = Navigator::default();
        nav.navigate_to(SectionId::Nerves, Some(SubsectionId::UpperLimbNerves))
            .unwrap();

        let err = nav
            .navigate_to(SectionId::Reference, Some(SubsectionId::FWaves))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidSubsection { .. }));
        assert_eq!(nav.state().active_section, Some(SectionId::Nerves));
        assert_eq!(nav.state().active_subsection, Some(SubsectionId::UpperLimbNerves));
    }

    #[test]
    fn test_navigate_to_section_missing_from_custom_menu() {
        let sections: Vec<Section> = menu()
            .into_iter()
            .filter(|s| s.id != SectionId::Pathologies)
            .collect();
        let mut nav = Navigator::new(sections);
        let err = nav.navigate_to(SectionId::Pathologies, None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidSection(id) if id == "pathologies"));
    }

    #[test]
    fn test_navigate_to_ids() {
        let mut nav = Navigator::default();
        nav.navigate_to_ids("nerves", Some("lower-limb-nerves")).unwrap();
        assert_eq!(nav.location().to_string(), "#nerves/lower-limb-nerves");

        assert!(matches!(
            nav.navigate_to_ids("cardiology", None),
            Err(CoreError::InvalidSection(_))
        ));
        assert!(matches!(
            nav.navigate_to_ids("nerves", Some("guidelines")),
            Err(CoreError::InvalidSubsection { .. })
        ));
        assert!(matches!(
            nav.navigate_to_ids("nerves", Some("no-such-thing")),
            Err(CoreError::InvalidSubsection { .. })
        ));
        assert_eq!(nav.location().to_string(), "#nerves/lower-limb-nerves");
    }

    #[test]
    fn test_go_home() {
        let mut nav = Navigator::default();
        nav.navigate_to(SectionId::Reference, Some(SubsectionId::Books)).unwrap();
        nav.go_home();
        assert!(nav.state().is_home());
        assert_eq!(nav.state().active_subsection, None);
    }

    #[test]
    fn test_parse_location_forms() {
        assert_eq!(parse_location("#").unwrap(), Location::HOME);
        assert_eq!(parse_location("").unwrap(), Location::HOME);
        assert_eq!(
            parse_location("#nerves/upper-limb-nerves").unwrap(),
            Location {
                section: Some(SectionId::Nerves),
                subsection: Some(SubsectionId::UpperLimbNerves),
            }
        );
        assert_eq!(
            parse_location("special-studies").unwrap(),
            Location {
                section: Some(SectionId::SpecialStudies),
                subsection: None,
            }
        );
        assert!(matches!(
            parse_location("#nerves/books"),
            Err(CoreError::InvalidSubsection { .. })
        ));
        assert!(matches!(
            parse_location("#unknown"),
            Err(CoreError::UnknownSection(_))
        ));
    }

    #[test]
    fn test_location_display_round_trips() {
        for section in menu() {
            for sub in &section.subsections {
                let loc = Location {
                    section: Some(section.id),
                    subsection: Some(*sub),
                };
                assert_eq!(parse_location(&loc.to_string()).unwrap(), loc);
            }
        }
    }

    #[test]
    fn test_subscribers_see_successful_transitions_only() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut nav = Navigator::default();
        let sink = seen.clone();
        nav.subscribe(move |state: &NavigationState| sink.borrow_mut().push(state.location()));

        nav.navigate_to(SectionId::Nerves, None).unwrap();
        let _ = nav.navigate_to(SectionId::Nerves, Some(SubsectionId::Books));
        nav.go_home();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].to_string(), "#nerves");
        assert_eq!(seen[1], Location::HOME);
    }

    #[test]
    fn test_region_mapping_round_trips() {
        for region in Region::ALL {
            assert_eq!(SubsectionId::for_region(region).region(), Some(region));
        }
        assert_eq!(SubsectionId::EmgBasics.region(), None);
    }
}
