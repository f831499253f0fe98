//! Data models and structures used throughout the application

use serde::{Deserialize, Serialize};

/// Content register chosen on the first screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    Profesional,
    Principiante,
}

impl AppMode {
    /// Label used in headers and in the exported guide
    pub fn label(&self) -> &'static str {
        match self {
            AppMode::Profesional => "Modo Profesional",
            AppMode::Principiante => "Modo Principiante",
        }
    }
}

/// Flowchart node shape, as tagged by the content service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepShape {
    Rectangle,
    Diamond,
    Oval,
    Terminator,
}

/// One stage of a recipe process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowchartStep {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub shape: StepShape,
}

/// AI-generated content for one (recipe, mode) selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub definition: String,
    pub process: Vec<FlowchartStep>,
    pub youtube_playlist_id: String,
}

/// Measurable safety thresholds for a preserve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalPoints {
    pub ph: Option<String>,
    pub brix: Option<String>,
}

/// Sterilization time for one container type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JarSterilizationTime {
    pub name: String,
    pub minutes: u32,
    pub image: String,
}

/// A single canning recipe with its safety parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preserve {
    pub id: String,
    pub name: String,
    pub image: String,
    pub critical_points: Option<CriticalPoints>,
    pub sterilization_times: Vec<JarSterilizationTime>,
}

/// A group of related preserves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub image: String,
    pub preserves: Vec<Preserve>,
}

/// Sender tag for one chat transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One entry of the chat transcript
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub sender: Sender,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_content_wire_names() {
        let json = r#"{
            "definition": "Se entiende por mermelada...",
            "process": [
                { "id": 1, "title": "Inicio", "description": "Inicio del proceso.", "shape": "terminator" }
            ],
            "youtubePlaylistId": "PLASDFGHJKL12345"
        }"#;
        let content: GeneratedContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.youtube_playlist_id, "PLASDFGHJKL12345");
        assert_eq!(content.process[0].shape, StepShape::Terminator);
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let json = r#"{ "id": 2, "title": "x", "description": "y", "shape": "hexagon" }"#;
        assert!(serde_json::from_str::<FlowchartStep>(json).is_err());
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(AppMode::Profesional.label(), "Modo Profesional");
        assert_eq!(AppMode::Principiante.label(), "Modo Principiante");
    }
}
