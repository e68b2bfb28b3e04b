// apps/wa_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 列出可用模型及其默认系数。

use anyhow::Result;
use clap::Args;
use tracing::info;
use wa_physics::turbulence::{ClosureFlavor, ClosureKind, WrayAgarwalCoeffs, F1_MAX};

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 只显示指定模型
    #[arg(short, long)]
    pub model: Option<String>,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== Wray-Agarwal 信息 ===");

    let kinds = match &args.model {
        Some(name) => vec![name.parse::<ClosureKind>()?],
        None => ClosureKind::ALL.to_vec(),
    };

    println!("版本: {}", env!("CARGO_PKG_VERSION"));
    println!("可用模型: {}", ClosureKind::type_names().join(", "));
    println!();
    print_base_coeffs();

    for kind in kinds {
        println!();
        print_model(kind);
    }
    Ok(())
}

fn print_base_coeffs() {
    let c = WrayAgarwalCoeffs::default();
    println!("=== 基础系数 ===");
    println!("  kappa   = {}", c.kappa);
    println!("  Cw      = {}", c.cw);
    println!("  C1ke    = {}", c.c1ke);
    println!("  C1kw    = {}", c.c1kw);
    println!("  sigmake = {}", c.sigmake);
    println!("  sigmakw = {}", c.sigmakw);
    println!("  C2ke    = {:.4} (C1ke/κ² + σke)", c.c2ke());
    println!("  C2kw    = {:.4} (C1kw/κ² + σkw)", c.c2kw());
    println!("  f1 上限 = {F1_MAX}");
}

fn print_model(kind: ClosureKind) {
    println!("=== {kind} ===");
    println!("  系数块: {}", kind.coeffs_dict_name());
    match ClosureFlavor::default_for(kind) {
        ClosureFlavor::Rans => println!("  纯 RANS"),
        ClosureFlavor::Bounded { cm } => println!("  第二耗散项上界: Cm = {cm}"),
        ClosureFlavor::Des(des) => {
            println!("  DES: CDES = {}, deltaCoeff = {}", des.cdes, des.delta_coeff);
            println!("  fdes = min(CDES Δ / √(R/S), 1)");
        }
        ClosureFlavor::DesDit(des) => {
            println!("  DES-DIT: CDES = {}, deltaCoeff = {}", des.cdes, des.delta_coeff);
            println!("  fdes = CDES Δ / √(R/S)，全场 LES");
        }
    }
}
