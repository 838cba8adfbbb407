//! Deployment configuration generator
//!
//! Renders `.env`, `docker-compose.yml` and, for Render, `render.yaml` from the
//! bundled templates. The template context always carries all three provider
//! key fields; providers that were not selected get an empty string so the
//! templates never see a missing variable.

use crate::common::mask_secret;
use crate::deploy::Platform;
use crate::error::Result;
use crate::llm::LlmProvider;
use log::{debug, info};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

pub const ENV_FILE_NAME: &str = ".env";
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";
pub const RENDER_FILE_NAME: &str = "render.yaml";

const ENV_TEMPLATE: &str = include_str!("templates/env.tera");
const COMPOSE_TEMPLATE: &str = include_str!("templates/docker-compose.tera");
const RENDER_TEMPLATE: &str = include_str!("templates/render.tera");

/// Named templates bundled with the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Env,
    Compose,
    RenderBlueprint,
}

impl Template {
    pub fn name(&self) -> &'static str {
        match self {
            Template::Env => "env",
            Template::Compose => "docker-compose",
            Template::RenderBlueprint => "render",
        }
    }

    fn body(&self) -> &'static str {
        match self {
            Template::Env => ENV_TEMPLATE,
            Template::Compose => COMPOSE_TEMPLATE,
            Template::RenderBlueprint => RENDER_TEMPLATE,
        }
    }
}

/// Inputs for a config generation run
pub struct ConfigRequest {
    pub output_dir: PathBuf,
    pub platform: Platform,
    pub provider: LlmProvider,
    pub api_key: SecretString,
    pub setup_password: SecretString,
    pub app_port: u16,
    pub openclaw_image: String,
    pub service_name: String,
}

/// Pointers to the written files plus a preview that is safe to display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedConfig {
    pub env_path: PathBuf,
    pub compose_path: PathBuf,
    #[serde(rename = "renderPath", skip_serializing_if = "Option::is_none")]
    pub blueprint_path: Option<PathBuf>,
    pub env_preview: String,
}

/// Values substituted into the templates
///
/// Holds plain secrets for rendering, so it deliberately has no `Debug`.
#[derive(Serialize)]
pub struct TemplateContext {
    app_port: u16,
    setup_password: String,
    provider: &'static str,
    openclaw_image: String,
    service_name: String,
    openai_api_key: String,
    anthropic_api_key: String,
    gemini_api_key: String,
}

impl TemplateContext {
    /// Build the context, mapping the key onto the selected provider's field only
    pub fn new(request: &ConfigRequest) -> Self {
        let key_for = |provider: LlmProvider| {
            if request.provider == provider {
                request.api_key.expose_secret().to_string()
            } else {
                String::new()
            }
        };

        Self {
            app_port: request.app_port,
            setup_password: request.setup_password.expose_secret().to_string(),
            provider: request.provider.as_str(),
            openclaw_image: request.openclaw_image.clone(),
            service_name: request.service_name.clone(),
            openai_api_key: key_for(LlmProvider::OpenAi),
            anthropic_api_key: key_for(LlmProvider::Anthropic),
            gemini_api_key: key_for(LlmProvider::Gemini),
        }
    }

    /// The per-provider key field for `provider`
    pub fn provider_key(&self, provider: LlmProvider) -> &str {
        match provider {
            LlmProvider::OpenAi => &self.openai_api_key,
            LlmProvider::Anthropic => &self.anthropic_api_key,
            LlmProvider::Gemini => &self.gemini_api_key,
        }
    }
}

/// Whether `platform` is deployed from a Render blueprint
pub fn supports_render_blueprint(platform: Platform) -> bool {
    platform == Platform::Render
}

/// Render one bundled template with `context`
pub fn render_template(template: Template, context: &TemplateContext) -> Result<String> {
    let context = Context::from_serialize(context)?;
    let rendered = Tera::one_off(template.body(), &context, false)?;
    debug!("Rendered template '{}' ({} bytes)", template.name(), rendered.len());
    Ok(rendered)
}

/// Write `data` to `path`, creating missing parent directories
pub fn write_text_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data)?;
    Ok(())
}

/// Render and write the deployment files for `request`
pub fn generate_config(request: &ConfigRequest) -> Result<GeneratedConfig> {
    let output_dir = std::path::absolute(&request.output_dir)?;
    let context = TemplateContext::new(request);

    let env_path = output_dir.join(ENV_FILE_NAME);
    let compose_path = output_dir.join(COMPOSE_FILE_NAME);

    let env_body = render_template(Template::Env, &context)?;
    let compose_body = render_template(Template::Compose, &context)?;
    write_text_file(&env_path, &env_body)?;
    write_text_file(&compose_path, &compose_body)?;

    let blueprint_path = if supports_render_blueprint(request.platform) {
        let path = output_dir.join(RENDER_FILE_NAME);
        let body = render_template(Template::RenderBlueprint, &context)?;
        write_text_file(&path, &body)?;
        Some(path)
    } else {
        None
    };

    info!(
        "Generated configuration for {} in {}",
        request.platform,
        output_dir.display()
    );

    Ok(GeneratedConfig {
        env_path,
        compose_path,
        blueprint_path,
        env_preview: env_preview(request),
    })
}

/// The `.env` summary shown to the user, with every secret masked
pub fn env_preview(request: &ConfigRequest) -> String {
    let mut lines = vec![
        format!(
            "SETUP_PASSWORD={}",
            mask_secret(request.setup_password.expose_secret())
        ),
        format!("OPENCLAW_PORT={}", request.app_port),
        format!("OPENCLAW_LLM_PROVIDER={}", request.provider),
    ];
    for provider in LlmProvider::ALL {
        if provider == request.provider {
            lines.push(format!(
                "{}={}",
                provider.env_var(),
                mask_secret(request.api_key.expose_secret())
            ));
        } else {
            lines.push(format!("{}=(not set)", provider.env_var()));
        }
    }
    lines.join("\n")
}
