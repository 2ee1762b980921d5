//! The per-frame driver.

use crate::camera::PerspectiveCamera;
use crate::context::AppContext;
use crate::material::MaterialHandle;
use crate::paint::Color;
use crate::scene::SceneObject;

/// Read-only view of one frame, handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub camera: &'a PerspectiveCamera,
    pub objects: &'a [SceneObject],
    pub material: &'a MaterialHandle,
    pub clear_color: Color,
    /// Physical size the surface must have for this frame.
    pub surface_size: (u32, u32),
}

/// Consumer of finished frames.
pub trait FrameSubmitter {
    fn submit(&mut self, view: &SceneView<'_>) -> anyhow::Result<()>;
}

/// Drives one tick at a time. The host schedules the next tick after
/// [`tick`](Self::tick) returns.
#[derive(Debug, Default)]
pub struct AnimationLoop {
    frames: u64,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames submitted so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One frame, in fixed order:
    /// 1. pick up a finished asset load
    /// 2. apply the pending resize
    /// 3. set every rotation from `elapsed`
    /// 4. advance orbit damping
    /// 5. submit
    pub fn tick(
        &mut self,
        ctx: &mut AppContext,
        elapsed: f32,
        submitter: &mut dyn FrameSubmitter,
    ) -> anyhow::Result<()> {
        ctx.scene.sync();

        if let Some(event) = ctx.take_pending_resize() {
            ctx.apply_resize(event)?;
        }

        for object in ctx.scene.objects_mut() {
            object.spin_to(elapsed);
        }

        ctx.controls.update(&mut ctx.camera);

        let view = SceneView {
            camera: &ctx.camera,
            objects: ctx.scene.objects(),
            material: ctx.scene.material(),
            clear_color: ctx.clear_color(),
            surface_size: ctx.surface_size(),
        };
        submitter.submit(&view)?;

        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;
    use crate::asset::{NodeGraph, PendingAsset, SceneNode};
    use crate::material::{HalftoneUniforms, ShaderSources};
    use crate::params::{ParamEdit, ParamId, ParamValue, ParameterStore};
    use crate::scene::{MeshData, SceneConfig};
    use crate::viewport::ResizeEvent;

    /// What the renderer saw at submission.
    #[derive(Debug, Clone)]
    struct Frame {
        rotations: Vec<(String, Vec3)>,
        uniforms: HalftoneUniforms,
        parts: usize,
        parts_sharing_material: usize,
        aspect: f32,
        surface_size: (u32, u32),
    }

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
    }

    impl FrameSubmitter for Recorder {
        fn submit(&mut self, view: &SceneView<'_>) -> anyhow::Result<()> {
            let parts: Vec<_> = view.objects.iter().flat_map(|o| &o.parts).collect();
            self.frames.push(Frame {
                rotations: view.objects.iter().map(|o| (o.name.clone(), o.rotation)).collect(),
                uniforms: view.material.uniforms(),
                parts: parts.len(),
                parts_sharing_material: parts
                    .iter()
                    .filter(|p| p.material.ptr_eq(view.material))
                    .count(),
                aspect: view.camera.aspect(),
                surface_size: view.surface_size,
            });
            Ok(())
        }
    }

    impl Recorder {
        fn last(&self) -> &Frame {
            self.frames.last().unwrap()
        }

        fn rotation(&self, name: &str) -> Vec3 {
            self.last().rotations.iter().find(|(n, _)| n == name).unwrap().1
        }
    }

    fn context() -> AppContext {
        AppContext::new(
            &SceneConfig::default(),
            ParameterStore::default(),
            ShaderSources::builtin(),
            ResizeEvent::new(800.0, 600.0, 1.0),
        )
        .unwrap()
    }

    fn monkey() -> NodeGraph {
        NodeGraph {
            nodes: vec![SceneNode {
                name: Some("Suzanne".into()),
                local: Mat4::IDENTITY,
                meshes: vec![MeshData::sphere(1.0, 8, 4)],
                children: Vec::new(),
            }],
            roots: vec![0],
        }
    }

    // ── transforms ─────────────────────────────────────────────────────────

    #[test]
    fn rotations_are_zero_at_start() {
        let (mut ctx, mut anim, mut rec) = (context(), AnimationLoop::new(), Recorder::default());
        anim.tick(&mut ctx, 0.0, &mut rec).unwrap();

        assert!(rec.last().rotations.iter().all(|(_, r)| *r == Vec3::ZERO));
    }

    #[test]
    fn rotation_follows_elapsed_time() {
        let (mut ctx, mut anim, mut rec) = (context(), AnimationLoop::new(), Recorder::default());

        anim.tick(&mut ctx, 10.0, &mut rec).unwrap();
        assert_eq!(rec.rotation("torus knot"), Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(rec.rotation("sphere"), Vec3::new(-1.0, 2.0, 0.0));

        let mut last = rec.rotation("sphere");
        for t in [10.5, 11.0, 20.0, 100.0] {
            anim.tick(&mut ctx, t, &mut rec).unwrap();
            let r = rec.rotation("sphere");
            assert!(r.x < last.x);
            assert!(r.y > last.y);
            last = r;
        }
        assert_eq!(anim.frames(), 5);
    }

    // ── parameters ─────────────────────────────────────────────────────────

    #[test]
    fn panel_repetition_reaches_next_render() {
        let (mut ctx, mut anim, mut rec) = (context(), AnimationLoop::new(), Recorder::default());
        anim.tick(&mut ctx, 0.0, &mut rec).unwrap();
        assert_eq!(rec.last().uniforms.repetition, 100.0);

        ctx.apply_edit(ParamEdit::new(ParamId::Repetition, ParamValue::Number(50.0))).unwrap();
        anim.tick(&mut ctx, 0.016, &mut rec).unwrap();
        assert_eq!(rec.last().uniforms.repetition, 50.0);
    }

    // ── assets ─────────────────────────────────────────────────────────────

    #[test]
    fn asset_arriving_mid_session_shares_material() {
        let (mut ctx, mut anim, mut rec) = (context(), AnimationLoop::new(), Recorder::default());
        anim.tick(&mut ctx, 1.0, &mut rec).unwrap();
        assert_eq!(rec.last().rotations.len(), 2);

        ctx.scene.attach(PendingAsset::ready("assets/suzanne.glb", Ok(monkey())));
        anim.tick(&mut ctx, 2.0, &mut rec).unwrap();

        let frame = rec.last();
        assert_eq!(frame.rotations.len(), 3);
        assert_eq!(frame.parts, 3);
        assert_eq!(frame.parts_sharing_material, 3);
        assert_eq!(rec.rotation("suzanne"), Vec3::new(-0.2, 0.5, 0.0));

        let green = crate::paint::Color::linear(0.0, 1.0, 0.0);
        ctx.apply_edit(ParamEdit::new(ParamId::BaseColor, ParamValue::Color(green))).unwrap();
        anim.tick(&mut ctx, 3.0, &mut rec).unwrap();

        assert_eq!(rec.last().uniforms.base_color, green.to_array());
        for object in ctx.scene.objects() {
            for part in &object.parts {
                assert_eq!(part.material.uniforms().base_color, green.to_array());
            }
        }
    }

    // ── resize ─────────────────────────────────────────────────────────────

    #[test]
    fn pending_resize_applies_before_submit() {
        let (mut ctx, mut anim, mut rec) = (context(), AnimationLoop::new(), Recorder::default());
        ctx.request_resize(ResizeEvent::new(1280.0, 720.0, 1.0));
        ctx.request_resize(ResizeEvent::new(1600.0, 900.0, 3.0));
        anim.tick(&mut ctx, 0.0, &mut rec).unwrap();

        let frame = rec.last();
        assert_eq!(frame.aspect, 1600.0 / 900.0);
        assert_eq!(frame.uniforms.resolution, [3200.0, 1800.0]);
        assert_eq!(frame.surface_size, (3200, 1800));
    }

    #[test]
    fn failed_submit_does_not_count_frame() {
        struct Failing;
        impl FrameSubmitter for Failing {
            fn submit(&mut self, _: &SceneView<'_>) -> anyhow::Result<()> {
                anyhow::bail!("surface lost")
            }
        }

        let (mut ctx, mut anim) = (context(), AnimationLoop::new());
        assert!(anim.tick(&mut ctx, 0.0, &mut Failing).is_err());
        assert_eq!(anim.frames(), 0);
    }
}
