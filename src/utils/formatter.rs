use crate::Result;
use crate::parser::TestSuite;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

/// 输出文档格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "text/yaml",
            OutputFormat::Json => "application/json",
        }
    }
}

pub struct SuiteFormatter {
    format: OutputFormat,
    color: bool,
}

impl SuiteFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: true,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// 渲染为文档（字段按结构体顺序输出，不排序）
    pub fn render(&self, suite: &TestSuite) -> Result<String> {
        match self.format {
            OutputFormat::Yaml => Ok(serde_yaml::to_string(suite)?),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(suite)?),
        }
    }

    /// 用例概览表
    pub fn table(&self, suite: &TestSuite) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_header(vec!["#", "Name", "Method", "URL", "Headers", "Payload", "Repeat"]);

        for (i, case) in suite.api_tests.iter().enumerate() {
            let method_color = match case.method.as_str() {
                "GET" | "HEAD" | "OPTIONS" => Color::Green,
                "DELETE" => Color::Red,
                _ => Color::Yellow,
            };
            let mut method = Cell::new(&case.method);
            let mut url = Cell::new(&case.url);
            if self.color {
                method = method.fg(method_color);
                url = url.add_attribute(Attribute::Dim);
            }

            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(&case.api_name),
                method,
                url,
                Cell::new(case.headers.len()),
                Cell::new(format!("{} bytes", case.payload.len())),
                Cell::new(case.repeat),
            ]);
        }

        if !self.color {
            table.force_no_tty();
        }
        table.to_string()
    }

    /// 一行摘要
    pub fn summary(&self, source: &str, suite: &TestSuite) -> String {
        let count = format!("{} api tests", suite.len());
        if !self.color {
            return format!("Extracted {} from {}", count, source);
        }
        let count = if suite.is_empty() {
            count.yellow()
        } else {
            count.green()
        };
        format!("Extracted {} from {}", count.bold(), source.bold())
    }
}
