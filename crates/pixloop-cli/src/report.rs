//! Scene summaries for `pixloop inspect`.

use serde::Serialize;

use pixloop_render::{FrameSequence, FrameSource, PassInfo};

#[derive(Debug, Serialize)]
pub struct EntityCount {
    pub set: &'static str,
    pub count: usize,
}

/// Everything `inspect` reports about one rendered scene.
#[derive(Debug, Serialize)]
pub struct SceneReport {
    pub scene: &'static str,
    pub width: u32,
    pub height: u32,
    pub frames: usize,
    pub fps: u32,
    pub frame_duration_ms: u32,
    pub entity_seed: u64,
    pub layout_seed: u64,
    pub passes: Vec<PassInfo>,
    pub entities: Vec<EntityCount>,
    pub content_hash: String,
}

impl SceneReport {
    pub fn new(source: &dyn FrameSource, sequence: &FrameSequence) -> Self {
        let settings = source.settings();
        Self {
            scene: source.name(),
            width: sequence.width,
            height: sequence.height,
            frames: sequence.len(),
            fps: sequence.fps,
            frame_duration_ms: sequence.frame_duration_ms,
            entity_seed: settings.entity_seed,
            layout_seed: settings.layout_seed,
            passes: source.passes(),
            entities: source
                .entity_counts()
                .into_iter()
                .map(|(set, count)| EntityCount { set, count })
                .collect(),
            content_hash: sequence.content_hash().to_hex(),
        }
    }

    pub fn print(&self) {
        println!("▶ Scene: {}", self.scene);
        println!(
            "   ├ {}x{}, {} frames @ {}fps ({}ms/frame)",
            self.width, self.height, self.frames, self.fps, self.frame_duration_ms
        );
        println!(
            "   ├ Seeds: entity {}, layout {}",
            self.entity_seed, self.layout_seed
        );
        println!("   ├ Passes:");
        for (i, pass) in self.passes.iter().enumerate() {
            println!("   │  {:>2}. {:<12} {:?}", i + 1, pass.name, pass.kind);
        }
        println!("   ├ Entities:");
        for entity in &self.entities {
            println!("   │  {:<12} {}", entity.set, entity.count);
        }
        println!("   └ Content hash: {}", self.content_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixloop_core::RenderSettings;
    use pixloop_render::{SceneKind, SequenceBuilder};

    #[test]
    fn test_report_lists_passes_and_entities() {
        let settings = RenderSettings {
            total_frames: 2,
            ..RenderSettings::default()
        };
        let source = SceneKind::Space.build(&settings).unwrap();
        let sequence = SequenceBuilder::render(source.as_ref()).unwrap();
        let report = SceneReport::new(source.as_ref(), &sequence);

        assert_eq!(report.scene, "space");
        assert_eq!(report.frames, 2);
        assert_eq!(report.passes.first().map(|p| p.name), Some("background"));
        assert!(report.entities.iter().any(|e| e.set == "stars" && e.count == 80));
        assert_eq!(report.content_hash.len(), 64);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let settings = RenderSettings {
            total_frames: 1,
            ..RenderSettings::default()
        };
        let source = SceneKind::Snow.build(&settings).unwrap();
        let sequence = SequenceBuilder::render(source.as_ref()).unwrap();
        let json = serde_json::to_value(SceneReport::new(source.as_ref(), &sequence)).unwrap();

        assert_eq!(json["scene"], "snow");
        assert_eq!(json["passes"][0]["name"], "sky");
        assert_eq!(json["passes"][0]["kind"], "backdrop");
        assert_eq!(json["entities"][0]["set"], "snowflakes");
    }
}
