// apps/wa_cli/src/commands/run.rs

//! 运行模型命令
//!
//! 在二维槽道上给定抛物线速度剖面，推进 Rnu 方程若干步：
//!
//! - `yMin`/`yMax` 为固壁，`xMin`/`xMax` 为进出口，`zMin`/`zMax` 为对称面
//! - 速度 `U = 4 Umax y (H - y) / H²` 固定，不随时间变化
//! - 给定湍流属性文件时，每步调用 `read()` 以响应系数修改

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use glam::DVec3;
use serde_json::json;
use tracing::{info, warn};
use wa_config::{Dictionary, TurbulenceProperties};
use wa_physics::fields::{FieldDb, SurfaceScalarField, VolField};
use wa_physics::mesh::{FvMesh, PatchKind, WallDistance};
use wa_physics::turbulence::{ClosureKind, FlowInputs, ModelBuilder, WrayAgarwalModel};

/// 运行参数
#[derive(Args)]
pub struct RunArgs {
    /// 湍流属性文件路径（缺省时使用 --model 与默认系数）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 模型类型名
    #[arg(short, long, default_value = "WrayAgarwal2017")]
    pub model: String,

    /// Rnu 边界条件文件（`{ patchName: {...} }`）
    #[arg(short, long)]
    pub boundary: Option<PathBuf>,

    /// 结果输出文件（JSON）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 流向单元数
    #[arg(long, default_value = "20")]
    pub nx: usize,

    /// 法向单元数
    #[arg(long, default_value = "40")]
    pub ny: usize,

    /// 槽道长度 [m]
    #[arg(long, default_value = "4.0")]
    pub length: f64,

    /// 槽道高度 [m]
    #[arg(long, default_value = "1.0")]
    pub height: f64,

    /// 中心线速度 [m/s]
    #[arg(long, default_value = "1.0")]
    pub u_max: f64,

    /// 分子运动粘度 [m²/s]
    #[arg(long, default_value = "1e-5")]
    pub nu: f64,

    /// 时间步长 [s]
    #[arg(long, default_value = "0.01")]
    pub dt: f64,

    /// 时间步数
    #[arg(short = 'n', long, default_value = "100")]
    pub steps: usize,

    /// 日志输出间隔（步）
    #[arg(long, default_value = "10")]
    pub report_interval: usize,

    /// 壁面粗糙度字段 `ks` 的均匀值（供 fieldBasedGradient 引用）
    #[arg(long)]
    pub ks: Option<f64>,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== Wray-Agarwal 槽道算例 ===");

    let mesh = channel_mesh(&args)?;
    let wall_distance = WallDistance::compute(&mesh);
    info!(
        "网格: {} 单元, {} 面, {} 个 patch",
        mesh.n_cells(),
        mesh.n_faces(),
        mesh.n_patches()
    );

    let (fields, phi) = channel_flow(&mesh, &args)?;

    let mut props = match &args.config {
        Some(path) => Some(
            TurbulenceProperties::from_file(path)
                .with_context(|| format!("无法读取湍流属性: {}", path.display()))?,
        ),
        None => None,
    };

    let mut builder = ModelBuilder::new(&mesh, &wall_distance).initial_rnu(3.0 * args.nu);
    builder = match &props {
        Some(p) => builder.properties(p.clone()),
        None => builder.kind(args.model.parse::<ClosureKind>()?),
    };
    if let Some(path) = &args.boundary {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取边界条件: {}", path.display()))?;
        builder = builder.rnu_boundary(Dictionary::from_json_str(&text)?);
    }
    let mut model = builder.build().context("构建湍流模型失败")?;

    let flow = FlowInputs::new(&fields, &phi, args.nu, args.dt);
    let start = Instant::now();
    info!("开始计算: {} 步, Δt = {} s", args.steps, args.dt);

    for step in 1..=args.steps {
        if let Some(p) = props.as_mut() {
            if model.read(p)? {
                info!("第 {step} 步: 已重新读取系数");
            }
        }

        let stats = model.correct(&flow)?;
        if !stats.converged {
            warn!("第 {step} 步: Rnu 线性求解未收敛");
        }
        if step % args.report_interval.max(1) == 0 || step == args.steps {
            info!(
                "步 {step}: Rnu ∈ [{:.3e}, {:.3e}], νt_max = {:.3e}, 截断 {} 个单元, LES {} 个单元, {} 次迭代",
                stats.rnu_min,
                stats.rnu_max,
                stats.nut_max,
                stats.clipped_cells,
                stats.les_cells,
                stats.iterations
            );
        }
    }

    info!("计算完成, 用时 {:.2?}", start.elapsed());
    print_summary(&model, &args);

    if let Some(path) = &args.output {
        write_results(&model, path)?;
        info!("结果已写入 {}", path.display());
    }
    Ok(())
}

fn channel_mesh(args: &RunArgs) -> Result<FvMesh> {
    let kinds = [
        PatchKind::Patch,
        PatchKind::Patch,
        PatchKind::Wall,
        PatchKind::Wall,
        PatchKind::Symmetry,
        PatchKind::Symmetry,
    ];
    let dz = args.height / args.ny.max(1) as f64;
    let mut mesh = FvMesh::cartesian_box(
        [args.nx, args.ny, 1],
        DVec3::new(args.length, args.height, dz),
        kinds,
    )?;
    mesh.rename_patch("xMin", "inlet")?;
    mesh.rename_patch("xMax", "outlet")?;
    mesh.rename_patch("yMin", "lowerWall")?;
    mesh.rename_patch("yMax", "upperWall")?;
    Ok(mesh)
}

/// 抛物线速度场、通量与源字段
fn channel_flow(mesh: &FvMesh, args: &RunArgs) -> Result<(FieldDb, SurfaceScalarField)> {
    let h = args.height;
    let u_max = args.u_max;
    let profile = |p: DVec3| {
        let y = p.y.clamp(0.0, h);
        DVec3::new(4.0 * u_max * y * (h - y) / (h * h), 0.0, 0.0)
    };

    let internal = (0..mesh.n_cells()).map(|c| profile(mesh.cell_centre(c))).collect();
    let mut u = VolField::from_internal("U", mesh, internal)?;
    for p in 0..mesh.n_patches() {
        let values: Vec<DVec3> = mesh.patch(p).faces().map(|f| profile(mesh.face_centre(f))).collect();
        u.boundary_mut(p).copy_from_slice(&values);
    }
    let phi = SurfaceScalarField::flux("phi", mesh, &u);

    let mut fields = FieldDb::new();
    fields.insert(u)?;
    if let Some(ks) = args.ks {
        fields.insert(VolField::uniform("ks", mesh, ks))?;
    }
    Ok((fields, phi))
}

fn print_summary(model: &WrayAgarwalModel<'_>, args: &RunArgs) {
    let mesh = model.mesh();
    println!("\n=== {} ===", model.kind());
    println!("x = {:.3} m 处的法向剖面:", args.length * 0.5);
    println!("{:>10} {:>12} {:>12} {:>8}", "y", "Rnu", "nut", "f1");

    let i = args.nx / 2;
    for j in 0..args.ny {
        let c = i + args.nx * j;
        if c >= mesh.n_cells() {
            break;
        }
        println!(
            "{:>10.4} {:>12.4e} {:>12.4e} {:>8.4}",
            mesh.cell_centre(c).y,
            model.rnu().get(c),
            model.nut().get(c),
            model.f1().get(c)
        );
    }
}

fn write_results(model: &WrayAgarwalModel<'_>, path: &Path) -> Result<()> {
    let mut value = json!({
        "model": model.kind().type_name(),
        "coeffs": model.write_coeffs().to_value(),
        "boundary": model.rnu_boundary().write(model.mesh()).to_value(),
        "Rnu": model.rnu().internal(),
        "nut": model.nut().internal(),
        "f1": model.f1().internal(),
        "stats": model.last_stats(),
    });
    if let (Some(fdes), Some(delta), Some(les)) = (model.fdes(), model.out_delta(), model.les_region()) {
        value["fdes"] = json!(fdes.internal());
        value["outDelta"] = json!(delta.internal());
        value["LESRegion"] = json!(les.internal());
    }
    let text = serde_json::to_string_pretty(&value)?;
    std::fs::write(path, text).with_context(|| format!("无法写入 {}", path.display()))?;
    Ok(())
}
