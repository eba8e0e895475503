//! # Content Resolution
//!
//! Maps a navigation state (plus the list view's nerve selection) to the
//! unit of content the UI should render.
//!
//! ```text
//! (section, subsection, selected nerve)
//!          │
//!          ▼
//!   ContentResolver::resolve ──► ContentUnit
//!                                 ├── Welcome          (no section)
//!                                 ├── SectionOverview  (section only)
//!                                 ├── NerveList        (nerves/<region>)
//!                                 ├── NerveDetail      (nerves/<region> + selection)
//!                                 ├── Article          (authored pages)
//!                                 ├── Placeholder      (known, not yet written)
//!                                 └── NotFound         (anything else)
//! ```
//!
//! Units carry translation keys and catalog references only. Translation
//! happens at render time so a language switch never needs re-resolution.
//! Resolution is total: it never panics and never returns an error.

use std::sync::Arc;

use log::debug;

use crate::core::catalog::{NerveCatalog, NerveRecord, ReferenceValue, Region};
use crate::core::error::{CoreError, Result};
use crate::core::navigation::{
    Location, NavigationState, Section, SectionId, SubsectionId, menu, parse_location,
};

// ============================================================================
// Content units
// ============================================================================

/// A welcome-screen shortcut into the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturedEntry {
    pub section: SectionId,
    pub subsection: SubsectionId,
}

impl FeaturedEntry {
    pub fn title_key(&self) -> String {
        self.section.label_key()
    }

    pub fn description_key(&self) -> &'static str {
        self.section.feature_key()
    }

    pub fn location(&self) -> Location {
        Location {
            section: Some(self.section),
            subsection: Some(self.subsection),
        }
    }
}

/// One block of an authored article. Every `&'static str` is a translation key
/// except `Link::url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(&'static str),
    Subheading(&'static str),
    Paragraph(&'static str),
    Bullets(Vec<&'static str>),
    Table {
        header: Option<[&'static str; 2]>,
        rows: Vec<[&'static str; 2]>,
    },
    Link {
        label: &'static str,
        url: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub introduction: &'static str,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentUnit<'a> {
    Welcome {
        featured: Vec<FeaturedEntry>,
    },
    SectionOverview {
        section: SectionId,
        subsections: Vec<SubsectionId>,
    },
    NerveList {
        subsection: SubsectionId,
        region: Region,
        nerves: Vec<&'a NerveRecord>,
    },
    NerveDetail {
        subsection: SubsectionId,
        nerve: &'a NerveRecord,
    },
    Article(Article),
    Placeholder {
        section: SectionId,
        subsection: SubsectionId,
    },
    NotFound {
        location: String,
    },
}

impl ContentUnit<'_> {
    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentUnit::Welcome { .. } => "welcome",
            ContentUnit::SectionOverview { .. } => "section-overview",
            ContentUnit::NerveList { .. } => "nerve-list",
            ContentUnit::NerveDetail { .. } => "nerve-detail",
            ContentUnit::Article(_) => "article",
            ContentUnit::Placeholder { .. } => "placeholder",
            ContentUnit::NotFound { .. } => "not-found",
        }
    }

    /// Every translation key this unit refers to.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        match self {
            ContentUnit::Welcome { featured } => {
                keys.extend(
                    [
                        "welcome.title",
                        "welcome.description",
                        "welcome.howToUse",
                        "welcome.instructions",
                        "welcome.featured",
                    ]
                    .map(String::from),
                );
                for entry in featured {
                    keys.push(entry.title_key());
                    keys.push(entry.description_key().to_string());
                    keys.push(entry.subsection.label_key());
                }
            }
            ContentUnit::SectionOverview {
                section,
                subsections,
            } => {
                keys.push(section.label_key());
                keys.push(section.feature_key().to_string());
                keys.push("overview.selectSubsection".to_string());
                keys.push("overview.subsections".to_string());
                keys.extend(subsections.iter().map(|s| s.label_key()));
            }
            ContentUnit::NerveList {
                subsection, region, ..
            } => {
                keys.push(subsection.label_key());
                keys.push(format!("regions.{region}"));
                keys.push("nerves.count".to_string());
                keys.push("nerves.selectNerveDescription".to_string());
            }
            ContentUnit::NerveDetail { subsection, nerve } => {
                keys.push(subsection.label_key());
                keys.push(format!("regions.{}", nerve.region));
                keys.extend(nerve_detail_keys(nerve).into_iter().map(String::from));
            }
            ContentUnit::Article(article) => {
                keys.push(article.title.clone());
                keys.push(article.introduction.to_string());
                for block in &article.blocks {
                    match block {
                        Block::Heading(k) | Block::Subheading(k) | Block::Paragraph(k) => {
                            keys.push(k.to_string())
                        }
                        Block::Bullets(items) => keys.extend(items.iter().map(|k| k.to_string())),
                        Block::Table { header, rows } => {
                            keys.extend(header.iter().flatten().map(|k| k.to_string()));
                            keys.extend(rows.iter().flatten().map(|k| k.to_string()));
                        }
                        Block::Link { label, .. } => keys.push(label.to_string()),
                    }
                }
            }
            ContentUnit::Placeholder {
                section,
                subsection,
            } => {
                keys.push(section.label_key());
                keys.push(subsection.label_key());
                keys.push("content.inDevelopment".to_string());
            }
            ContentUnit::NotFound { .. } => {
                keys.push("content.notFound.title".to_string());
                keys.push("content.notFound.description".to_string());
            }
        }
        keys
    }
}

/// Keys of the nerve detail view. Which sections appear depends on the
/// fields the record carries.
fn nerve_detail_keys(nerve: &NerveRecord) -> Vec<&'static str> {
    let mut keys = vec!["nerves.backToList"];
    if !nerve.has_conduction_values() {
        keys.push("nerves.noConductionValues");
    }

    let mut values: Vec<&ReferenceValue> = Vec::new();
    if let Some(motor) = &nerve.motor {
        keys.extend(["nerves.motorConduction", "nerves.distalLatency", "nerves.amplitude"]);
        values.extend([&motor.distal_latency, &motor.amplitude]);
        for (key, value) in [
            ("nerves.conductionVelocity", &motor.conduction_velocity),
            ("nerves.fWave", &motor.f_wave),
            ("nerves.hReflex", &motor.h_reflex),
        ] {
            if let Some(value) = value {
                keys.push(key);
                values.push(value);
            }
        }
    }
    if let Some(sensory) = &nerve.sensory {
        keys.extend([
            "nerves.sensoryConduction",
            "nerves.peakLatency",
            "nerves.amplitude",
            "nerves.conductionVelocity",
        ]);
        values.extend([&sensory.peak_latency, &sensory.amplitude, &sensory.conduction_velocity]);
    }
    if !values.is_empty() {
        keys.extend(["nerves.referenceRange", "nerves.unit"]);
    }
    if values.iter().any(|v| v.notes.is_some()) {
        keys.push("nerves.notes");
    }

    keys.extend([
        "nerves.studyTechnique",
        "nerves.patientPositioning",
        "nerves.electrodeLocation",
        "nerves.stimulationPoints",
        "nerves.specialConsiderations",
    ]);
    if nerve.technique.special_considerations.is_none() {
        keys.push("nerves.noSpecialConsiderations");
    }

    if let Some(adjustments) = &nerve.adjustments {
        keys.push("nerves.adjustmentVariables");
        if !adjustments.age.is_empty() {
            keys.extend(["nerves.age", "nerves.ageRange"]);
        }
        if !adjustments.height.is_empty() {
            keys.extend(["nerves.height", "nerves.heightRange"]);
        }
        if adjustments.gender.is_some() {
            keys.push("nerves.gender");
        }
        if adjustments.temperature.is_some() {
            keys.push("nerves.temperature");
        }
    }

    if let Some(media) = &nerve.multimedia {
        if media.technique_photo_url.is_some() {
            keys.push("nerves.studyTechniqueAlt");
        }
        if media.anatomical_diagram_url.is_some() {
            keys.push("nerves.anatomicalDiagram");
        }
    }
    keys
}

// ============================================================================
// Resolver
// ============================================================================

#[derive(Debug, Clone)]
pub struct ContentResolver {
    catalog: Arc<NerveCatalog>,
}

impl ContentResolver {
    pub fn new(catalog: Arc<NerveCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &NerveCatalog {
        &self.catalog
    }

    /// Resolve the unit for `state`. `selected_nerve` is the list view's
    /// selection and only matters inside a `nerves` region subsection.
    pub fn resolve(&self, state: &NavigationState, selected_nerve: Option<&str>) -> ContentUnit<'_> {
        let unit = self.resolve_inner(state, selected_nerve);
        debug!("Resolved {} -> {}", state.location(), unit.kind());
        unit
    }

    /// Resolve a raw `#section/subsection` string against the canonical menu.
    /// Unknown ids resolve to `NotFound` instead of an error.
    pub fn resolve_location(&self, raw: &str, selected_nerve: Option<&str>) -> ContentUnit<'_> {
        match parse_location(raw) {
            Ok(location) => {
                let state = NavigationState {
                    sections: menu(),
                    active_section: location.section,
                    active_subsection: location.subsection,
                };
                self.resolve(&state, selected_nerve)
            }
            Err(e) => {
                debug!("Location '{}' does not resolve: {}", raw, e);
                ContentUnit::NotFound {
                    location: raw.to_string(),
                }
            }
        }
    }

    /// Startup check: every location in `sections` resolves to something
    /// other than `NotFound`, and every region subsection lists at least one
    /// nerve.
    pub fn verify(&self, sections: &[Section]) -> Result<()> {
        for section in sections {
            for &sub in &section.subsections {
                if let Some(region) = sub.region()
                    && self.catalog.get_by_region(region).is_empty()
                {
                    return Err(CoreError::DatasetIntegrity(format!(
                        "subsection '{sub}' lists region '{region}' but the catalog has no nerves there"
                    )));
                }
                let state = NavigationState {
                    sections: sections.to_vec(),
                    active_section: Some(section.id),
                    active_subsection: Some(sub),
                };
                if let ContentUnit::NotFound { location } = self.resolve(&state, None) {
                    return Err(CoreError::DatasetIntegrity(format!(
                        "menu location {location} has no content"
                    )));
                }
            }
        }
        Ok(())
    }

    fn resolve_inner(&self, state: &NavigationState, selected_nerve: Option<&str>) -> ContentUnit<'_> {
        let not_found = || ContentUnit::NotFound {
            location: state.location().to_string(),
        };

        let Some(section_id) = state.active_section else {
            return match state.active_subsection {
                None => ContentUnit::Welcome {
                    featured: featured_entries(),
                },
                Some(_) => not_found(),
            };
        };
        let Some(section) = state.section(section_id) else {
            return not_found();
        };
        let Some(subsection) = state.active_subsection else {
            return ContentUnit::SectionOverview {
                section: section_id,
                subsections: section.subsections.clone(),
            };
        };
        if !section.contains(subsection) || subsection.parent() != section_id {
            return not_found();
        }

        let placeholder = ContentUnit::Placeholder {
            section: section_id,
            subsection,
        };
        match section_id {
            SectionId::Nerves => match subsection.region() {
                Some(region) => self.nerve_view(subsection, region, selected_nerve),
                None => not_found(),
            },
            SectionId::NerveConduction => match subsection {
                SubsectionId::UpperLimbMotor => ContentUnit::Article(upper_limb_motor_article()),
                _ => placeholder,
            },
            SectionId::EmgTechniques => match subsection {
                SubsectionId::EmgBasics => ContentUnit::Article(emg_basics_article()),
                _ => placeholder,
            },
            SectionId::SpecialStudies
            | SectionId::Pathologies
            | SectionId::ClinicalCases
            | SectionId::Reference => placeholder,
        }
    }

    fn nerve_view(
        &self,
        subsection: SubsectionId,
        region: Region,
        selected_nerve: Option<&str>,
    ) -> ContentUnit<'_> {
        if let Some(nerve) = selected_nerve
            .and_then(|id| self.catalog.get_by_id(id))
            .filter(|n| n.region == region)
        {
            return ContentUnit::NerveDetail { subsection, nerve };
        }
        ContentUnit::NerveList {
            subsection,
            region,
            nerves: self.catalog.get_by_region(region),
        }
    }
}

/// Welcome-screen shortcuts, in display order.
pub fn featured_entries() -> Vec<FeaturedEntry> {
    vec![
        FeaturedEntry {
            section: SectionId::NerveConduction,
            subsection: SubsectionId::UpperLimbMotor,
        },
        FeaturedEntry {
            section: SectionId::EmgTechniques,
            subsection: SubsectionId::EmgBasics,
        },
        FeaturedEntry {
            section: SectionId::ClinicalCases,
            subsection: SubsectionId::CarpalTunnel,
        },
        FeaturedEntry {
            section: SectionId::Reference,
            subsection: SubsectionId::Guidelines,
        },
        FeaturedEntry {
            section: SectionId::Nerves,
            subsection: SubsectionId::UpperLimbNerves,
        },
    ]
}

// ============================================================================
// Authored articles
// ============================================================================

const MEDIAN_PHOTO: &str =
    "https://images.unsplash.com/photo-1576091160550-2173dba999ef?auto=format&fit=crop&w=800&q=80";
const ULNAR_PHOTO: &str =
    "https://images.unsplash.com/photo-1576091160399-112ba8d25d1d?auto=format&fit=crop&w=800&q=80";

fn emg_basics_article() -> Article {
    Article {
        title: "emgBasics.pageTitle".to_string(),
        introduction: "emgBasics.introduction",
        blocks: vec![
            Block::Heading("emgBasics.principles.title"),
            Block::Bullets(vec![
                "emgBasics.principles.point1",
                "emgBasics.principles.point2",
                "emgBasics.principles.point3",
                "emgBasics.principles.point4",
                "emgBasics.principles.point5",
            ]),
            Block::Heading("emgBasics.motorUnit.title"),
            Block::Bullets(vec![
                "emgBasics.motorUnit.point1",
                "emgBasics.motorUnit.point2",
                "emgBasics.motorUnit.point3",
            ]),
            Block::Heading("emgBasics.signalTypes.title"),
            Block::Bullets(vec![
                "emgBasics.signalTypes.insertion",
                "emgBasics.signalTypes.spontaneous",
                "emgBasics.signalTypes.muap",
                "emgBasics.signalTypes.interference",
            ]),
            Block::Heading("emgBasics.signalChars.title"),
            Block::Table {
                header: None,
                rows: vec![
                    [
                        "emgBasics.signalChars.amplitude.title",
                        "emgBasics.signalChars.amplitude.desc",
                    ],
                    [
                        "emgBasics.signalChars.duration.title",
                        "emgBasics.signalChars.duration.desc",
                    ],
                    [
                        "emgBasics.signalChars.phases.title",
                        "emgBasics.signalChars.phases.desc",
                    ],
                    [
                        "emgBasics.signalChars.turns.title",
                        "emgBasics.signalChars.turns.desc",
                    ],
                    [
                        "emgBasics.signalChars.frequency.title",
                        "emgBasics.signalChars.frequency.desc",
                    ],
                ],
            },
            Block::Heading("emgBasics.equipment.title"),
            Block::Subheading("emgBasics.equipment.filters.title"),
            Block::Table {
                header: Some(["emgBasics.rangeLabel", "emgBasics.valueLabel"]),
                rows: vec![
                    [
                        "emgBasics.equipment.filters.lowPass",
                        "emgBasics.equipment.filters.lowPassValue",
                    ],
                    [
                        "emgBasics.equipment.filters.highPass",
                        "emgBasics.equipment.filters.highPassValue",
                    ],
                    [
                        "emgBasics.equipment.filters.notch",
                        "emgBasics.equipment.filters.notchValue",
                    ],
                ],
            },
            Block::Table {
                header: None,
                rows: vec![
                    ["emgBasics.equipment.gain.title", "emgBasics.equipment.gain.desc"],
                    ["emgBasics.equipment.sweep.title", "emgBasics.equipment.sweep.desc"],
                    ["emgBasics.equipment.cmrr.title", "emgBasics.equipment.cmrr.desc"],
                    [
                        "emgBasics.equipment.inputImpedance.title",
                        "emgBasics.equipment.inputImpedance.desc",
                    ],
                ],
            },
            Block::Heading("emgBasics.techConsiderations.title"),
            Block::Bullets(vec![
                "emgBasics.techConsiderations.temp",
                "emgBasics.techConsiderations.impedance",
                "emgBasics.techConsiderations.artifacts",
                "emgBasics.techConsiderations.relaxation",
                "emgBasics.techConsiderations.ground",
                "emgBasics.techConsiderations.needle",
                "emgBasics.techConsiderations.meds",
            ]),
            Block::Heading("emgBasics.references.title"),
            Block::Bullets(vec![
                "references.prestonShapiro",
                "references.kimura",
                "references.aanemGuidelines",
                "references.dumitru",
            ]),
        ],
    }
}

/// One nerve's motor protocol inside the upper limb motor article.
struct MotorProtocol {
    name: &'static str,
    stimulation_sites: &'static [&'static str],
    recording_site: &'static str,
    technique: &'static str,
    latency: &'static str,
    amplitude: &'static str,
    velocity: &'static str,
    photo: &'static str,
}

const UPPER_LIMB_MOTOR_PROTOCOLS: [MotorProtocol; 2] = [
    MotorProtocol {
        name: "nerveConduction.upperLimbMotor.median",
        stimulation_sites: &[
            "nerveConduction.upperLimbMotor.stimulationSites.wrist",
            "nerveConduction.upperLimbMotor.stimulationSites.antecubital",
            "nerveConduction.upperLimbMotor.stimulationSites.erb",
        ],
        recording_site: "nerveConduction.upperLimbMotor.recordingSites.apb",
        technique: "nerveConduction.upperLimbMotor.technique.median",
        latency: "nerveConduction.upperLimbMotor.normalValues.median.latency",
        amplitude: "nerveConduction.upperLimbMotor.normalValues.median.amplitude",
        velocity: "nerveConduction.upperLimbMotor.normalValues.median.velocity",
        photo: MEDIAN_PHOTO,
    },
    MotorProtocol {
        name: "nerveConduction.upperLimbMotor.ulnar",
        stimulation_sites: &[
            "nerveConduction.upperLimbMotor.stimulationSites.wrist",
            "nerveConduction.upperLimbMotor.stimulationSites.belowElbow",
            "nerveConduction.upperLimbMotor.stimulationSites.aboveElbow",
            "nerveConduction.upperLimbMotor.stimulationSites.axilla",
        ],
        recording_site: "nerveConduction.upperLimbMotor.recordingSites.adm",
        technique: "nerveConduction.upperLimbMotor.technique.ulnar",
        latency: "nerveConduction.upperLimbMotor.normalValues.ulnar.latency",
        amplitude: "nerveConduction.upperLimbMotor.normalValues.ulnar.amplitude",
        velocity: "nerveConduction.upperLimbMotor.normalValues.ulnar.velocity",
        photo: ULNAR_PHOTO,
    },
];

fn upper_limb_motor_article() -> Article {
    let mut blocks = Vec::new();
    for protocol in &UPPER_LIMB_MOTOR_PROTOCOLS {
        blocks.push(Block::Heading(protocol.name));
        blocks.push(Block::Subheading(
            "nerveConduction.upperLimbMotor.stimulationSitesTitle",
        ));
        blocks.push(Block::Bullets(protocol.stimulation_sites.to_vec()));
        blocks.push(Block::Subheading("nerveConduction.upperLimbMotor.recordingSiteTitle"));
        blocks.push(Block::Paragraph(protocol.recording_site));
        blocks.push(Block::Subheading("nerveConduction.upperLimbMotor.techniqueTitle"));
        blocks.push(Block::Paragraph(protocol.technique));
        blocks.push(Block::Subheading("nerveConduction.upperLimbMotor.normalValuesTitle"));
        blocks.push(Block::Table {
            header: Some([
                "nerveConduction.upperLimbMotor.parameter",
                "nerveConduction.upperLimbMotor.value",
            ]),
            rows: vec![
                ["nerveConduction.upperLimbMotor.distalLatency", protocol.latency],
                ["nerveConduction.upperLimbMotor.cmapAmplitude", protocol.amplitude],
                ["nerveConduction.upperLimbMotor.conductionVelocity", protocol.velocity],
            ],
        });
        blocks.push(Block::Link {
            label: "nerves.studyTechnique",
            url: protocol.photo,
        });
    }
    blocks.push(Block::Heading("nerveConduction.upperLimbMotor.technicalTips"));
    blocks.push(Block::Bullets(vec![
        "nerveConduction.upperLimbMotor.tips.temperature",
        "nerveConduction.upperLimbMotor.tips.distance",
        "nerveConduction.upperLimbMotor.tips.submaximal",
        "nerveConduction.upperLimbMotor.tips.block",
    ]));

    Article {
        title: SubsectionId::UpperLimbMotor.label_key(),
        introduction: "nerveConduction.upperLimbMotor.description",
        blocks,
    }
}
