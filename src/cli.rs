use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use jmx2yaml::config::{AppConfig, ConfigLoader};
use jmx2yaml::parser::{Extractor, JmxFileParser, TestSuite};
use jmx2yaml::utils::{OutputFormat, SuiteFormatter, ensure_jmx_extension};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about = "Convert JMeter test plans into API test case documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 配置文件路径（默认自动查找 jmx2yaml.toml）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 启动 HTTP 转换服务（POST /convert）
    Serve {
        /// 监听地址，覆盖配置文件
        #[arg(long)]
        host: Option<String>,

        /// 监听端口，覆盖配置文件
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// 转换本地 .jmx 文件
    Convert {
        path: PathBuf,

        /// 输出格式
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,

        /// 输出文件，缺省写到 stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 以表格形式查看提取出的用例
    Inspect {
        path: PathBuf,

        /// 关闭颜色
        #[arg(long)]
        no_color: bool,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = ConfigLoader::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            jmx2yaml::server::serve(&config).await?;
        }
        Commands::Convert {
            path,
            format,
            output,
        } => {
            let suite = load_suite(&path, &config)?;
            let document = SuiteFormatter::new(format).render(&suite)?;
            match output {
                Some(output) => {
                    std::fs::write(&output, document)
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                    eprintln!(
                        "{} {} -> {}",
                        "✓".green(),
                        path.display(),
                        output.display().to_string().bold()
                    );
                }
                None => print!("{}", document),
            }
        }
        Commands::Inspect { path, no_color } => {
            let suite = load_suite(&path, &config)?;
            let formatter = SuiteFormatter::new(OutputFormat::Yaml).with_color(!no_color);
            println!("{}", formatter.summary(&path.display().to_string(), &suite));
            if !suite.is_empty() {
                println!("{}", formatter.table(&suite));
            }
        }
    }
    Ok(())
}

/// 校验扩展名并解析本地文件
fn load_suite(path: &Path, config: &AppConfig) -> Result<TestSuite> {
    ensure_jmx_extension(&path.to_string_lossy())?;

    let extractor = Extractor::with_options(config.extract.clone());
    let suite = JmxFileParser::parse_file(path, &extractor)
        .with_context(|| format!("Failed to convert {}", path.display()))?;

    tracing::info!(path = %path.display(), api_tests = suite.len(), "Converted");
    Ok(suite)
}
