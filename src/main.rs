// ==========================================
// CNC 切割清单 - 命令行入口
// ==========================================
// 命令: convert（转换）/ inspect（预览）
// 退出码: 0 成功 / 2 文件访问 / 3 表结构 / 4 字段解析 / 5 领域约束 / 6 写入 / 7 配置 / 8 超时
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cnc_cutlist::config::{ConvertConfig, MachineSettings, ProfileMap};
use cnc_cutlist::domain::CellValue;
use cnc_cutlist::i18n::{self, t, t_with_args};
use cnc_cutlist::{logging, ConversionPipeline, ConvertError, OutputFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cnc-cutlist")]
#[command(about = "Excel/CSV 切割清单 → CNC 程序", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 输出 debug 日志
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 日志以 JSON 行输出到 stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// 界面语言
    #[arg(long, global = true, default_value = "zh-CN", value_parser = ["zh-CN", "en", "nl"])]
    locale: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 转换切割清单
    Convert {
        /// 输入文件（.xlsx/.xlsm/.xls/.ods/.csv）
        input: PathBuf,

        /// 输出文件（默认: 输入文件换扩展名）
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// 型材映射表 JSON
        #[arg(long)]
        profile_map: Option<PathBuf>,

        /// 输出格式 tap|csv|json（默认按输出扩展名）
        #[arg(short, long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        /// 工作表名（默认第一个）
        #[arg(long)]
        sheet: Option<String>,

        /// 机床参数 JSON
        #[arg(long)]
        settings: Option<PathBuf>,

        /// 默认材料（清单和映射表均未指定时）
        #[arg(long)]
        material: Option<String>,

        /// 仅校验并汇总，不写文件
        #[arg(long)]
        dry_run: bool,

        /// 整体截止时间（秒）
        #[arg(long)]
        deadline_secs: Option<u64>,
    },

    /// 预览列识别结果、前 N 行与摘要
    Inspect {
        input: PathBuf,

        /// 预览行数
        #[arg(short, long, default_value_t = 5)]
        limit: usize,

        #[arg(long)]
        sheet: Option<String>,

        #[arg(long)]
        profile_map: Option<PathBuf>,
    },
}

fn parse_format(value: &str) -> std::result::Result<OutputFormat, String> {
    OutputFormat::from_extension(value).ok_or_else(|| format!("不支持的格式: {}（tap|csv|json）", value))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_json(cli.verbose);
    } else {
        logging::init(cli.verbose);
    }
    i18n::set_locale(&cli.locale);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<ConvertError>()
                .map(|e| e.exit_code())
                .unwrap_or(1);
            eprintln!(
                "{}",
                t_with_args(
                    "convert.failed",
                    &[("code", &code.to_string()), ("message", &format!("{:#}", err))]
                )
            );
            ExitCode::from(code as u8)
        }
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Convert {
            input,
            out,
            profile_map,
            format,
            sheet,
            settings,
            material,
            dry_run,
            deadline_secs,
        } => {
            let mut config = ConvertConfig::new(input)
                .with_profile_map(load_profile_map(profile_map)?)
                .with_settings(load_settings(settings)?);
            config.output = out;
            config.format = format;
            config.sheet = sheet;
            config.dry_run = dry_run;
            config.deadline = deadline_secs.map(Duration::from_secs);
            if let Some(material) = material {
                config.default_material = material;
            }
            convert(&config)
        }
        Commands::Inspect {
            input,
            limit,
            sheet,
            profile_map,
        } => {
            let mut config = ConvertConfig::new(input).with_profile_map(load_profile_map(profile_map)?);
            config.sheet = sheet;
            inspect(&config, limit)
        }
    }
}

fn load_profile_map(path: Option<PathBuf>) -> Result<ProfileMap> {
    let map = ProfileMap::resolve(path.as_deref()).map_err(ConvertError::from)?;
    Ok(map)
}

fn load_settings(path: Option<PathBuf>) -> Result<MachineSettings> {
    match path {
        Some(path) => Ok(MachineSettings::load(&path).map_err(ConvertError::from)?),
        None => Ok(MachineSettings::default()),
    }
}

fn convert(config: &ConvertConfig) -> Result<()> {
    println!(
        "{}",
        t_with_args("convert.start", &[("input", &config.input.display().to_string())])
    );

    let report = ConversionPipeline::new(config)
        .run()
        .with_context(|| config.input.display().to_string())?;

    let records = report.records.to_string();
    let output = report.output.display().to_string();
    if report.written {
        println!(
            "{}",
            t_with_args("convert.done", &[("records", &records), ("output", &output)])
        );
    } else {
        println!(
            "{}",
            t_with_args("convert.dry_run", &[("records", &records), ("output", &output)])
        );
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    }

    let warnings = report.dq_report.warning_count();
    if warnings > 0 {
        println!(
            "{}",
            t_with_args("convert.warnings", &[("count", &warnings.to_string())])
        );
        for v in &report.dq_report.violations {
            println!("  [{}] {}: {}", v.row_number, v.field, v.message);
        }
    }
    Ok(())
}

fn inspect(config: &ConvertConfig, limit: usize) -> Result<()> {
    let report = ConversionPipeline::new(config)
        .inspect(limit)
        .with_context(|| config.input.display().to_string())?;

    println!("{}", t_with_args("inspect.sheet", &[("sheet", &report.sheet)]));

    println!("{}", t("inspect.columns"));
    let unrecognized = t("inspect.unrecognized");
    for (header, canonical) in &report.columns {
        let label = match canonical {
            Some(name) => name.to_string(),
            None => unrecognized.clone(),
        };
        println!("  {:<20} → {}", header, label);
    }

    println!(
        "{}",
        t_with_args("inspect.preview", &[("count", &report.preview.len().to_string())])
    );
    println!("  {}", report.headers.join(" | "));
    for row in &report.preview {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|c| match c {
                CellValue::Blank => String::new(),
                other => other.to_string(),
            })
            .collect();
        println!("  {}", cells.join(" | "));
    }

    println!("{}", t("inspect.summary"));
    println!("{}", serde_json::to_string_pretty(&report.summary)?);
    Ok(())
}
