// apps/wa_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 检查湍流属性文件：模型名、系数取值、滤波尺度类型，
//! 以及可选的 Rnu 边界条件文件。

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use tracing::{error, info, warn};
use wa_config::{Dictionary, TurbulenceProperties};
use wa_physics::turbulence::{ClosureFlavor, ClosureKind, WrayAgarwalCoeffs};

/// 各模型系数块中可识别的键
const BASE_KEYS: [&str; 6] = ["kappa", "Cw", "C1ke", "C1kw", "sigmake", "sigmakw"];

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 湍流属性文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// Rnu 边界条件文件路径
    #[arg(short, long)]
    pub boundary: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== 湍流属性验证 ===");

    let mut result = ValidationResult::default();
    validate_properties(&args.config, &mut result);
    if let Some(path) = &args.boundary {
        validate_boundary(path, &mut result);
    }

    print_validation_result(&result, args.strict)
}

fn validate_properties(path: &Path, result: &mut ValidationResult) {
    println!("\n检查湍流属性: {}", path.display());

    let props = match TurbulenceProperties::from_file(path) {
        Ok(props) => props,
        Err(e) => {
            result.add_error(format!("无法读取: {e}"));
            return;
        }
    };

    let kind = match props.model_name().and_then(|name| name.parse::<ClosureKind>()) {
        Ok(kind) => kind,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };
    println!("  模型: {kind}");

    let coeffs = match props.coeffs_dict(kind.type_name()) {
        Ok(coeffs) => coeffs,
        Err(e) => {
            result.add_error(e.to_string());
            return;
        }
    };
    if let Err(e) = WrayAgarwalCoeffs::from_dict(&coeffs) {
        result.add_error(e.to_string());
    }
    match ClosureFlavor::from_properties(kind, &props) {
        Ok(flavor) => println!("  变体: {flavor:?}"),
        Err(e) => result.add_error(e.to_string()),
    }

    let extra: &[&str] = match kind {
        ClosureKind::WrayAgarwal2017 => &[],
        ClosureKind::WrayAgarwal2017m => &["Cm"],
        ClosureKind::Wa2017Des | ClosureKind::Wa2017DesDit => &["CDES"],
    };
    for key in coeffs.keys() {
        if !BASE_KEYS.contains(&key) && !extra.contains(&key) {
            result.add_warning(format!("{} 中的未知系数 '{key}'", kind.coeffs_dict_name()));
        }
    }

    if let Ok(sim) = props.dict().get_word_or("simulationType", "") {
        let expected = if kind.is_hybrid() { "LES" } else { "RAS" };
        if !sim.is_empty() && sim != expected {
            result.add_warning(format!("simulationType = {sim}，{kind} 通常使用 {expected}"));
        }
    }

    if kind.is_hybrid() {
        match props.delta_type() {
            Ok(delta) if delta == wa_config::turbulence_properties::DEFAULT_DELTA => {}
            Ok(delta) => result.add_warning(format!("不支持的滤波尺度 '{delta}'，将使用 maxDeltaxyz")),
            Err(e) => result.add_error(e.to_string()),
        }
    }
}

fn validate_boundary(path: &Path, result: &mut ValidationResult) {
    println!("\n检查 Rnu 边界条件: {}", path.display());

    let dict = match std::fs::read_to_string(path)
        .map_err(wa_config::ConfigError::from)
        .and_then(|text| Dictionary::from_json_str(&text))
    {
        Ok(dict) => dict,
        Err(e) => {
            result.add_error(format!("无法读取: {e}"));
            return;
        }
    };

    for patch in dict.keys() {
        let entry = match dict.sub_dict(patch) {
            Ok(entry) => entry,
            Err(e) => {
                result.add_error(format!("patch '{patch}': {e}"));
                continue;
            }
        };
        let type_name = entry.get_word("type").unwrap_or_default();
        let required: &[&str] = match type_name.as_str() {
            "fixedValue" => &["value"],
            "zeroGradient" => &[],
            "fixedGradient" => &["gradient"],
            "fieldBasedGradient" => &["gradient", "field", "gradCoeff"],
            _ => {
                result.add_error(format!("patch '{patch}': 未知的边界类型 '{type_name}'"));
                continue;
            }
        };
        for key in required {
            if !entry.contains(key) {
                result.add_error(format!("patch '{patch}': {type_name} 缺少 '{key}'"));
            }
        }
        println!("  {patch}: {type_name}");
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("{err}");
            println!("  ✗ {err}");
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("{warning}");
            println!("  ⚠ {warning}");
        }
    }

    if result.is_ok(strict) {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
