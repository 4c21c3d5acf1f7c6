use std::path::{Path, PathBuf};

use crate::catalog::{TemplateInfo, TemplateKind, load_catalog, templates_for};
use crate::config::CliConfig;
use crate::prompt::{Choice, Prompter};
use crate::render::{PlaceholderRenderer, RenderContext, render_dir};
use stencil_constants::{DEFAULT_RENDER_IGNORE, TYPE_COMPONENT, TYPE_PROJECT};
use stencil_error::{Result, StencilError};
use stencil_package::{Package, PackageOptions};
use stencil_registry::Registry;
use stencil_utils::{empty_dir, ensure_dir_exists, is_dir_empty, is_valid_filename, kebab_case};

#[derive(Debug, Clone)]
pub struct InitOptions {
    pub project_dir: PathBuf,
    pub project_name: Option<String>,
    pub force: bool,
    pub skip_install: bool,
}

#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub kind: String,
    pub project_name: String,
    pub class_name: String,
    pub version: String,
    pub description: Option<String>,
    pub template: TemplateInfo,
}

impl ProjectInfo {
    #[must_use]
    pub fn render_context(&self) -> RenderContext {
        RenderContext::from([
            ("projectName".to_string(), self.project_name.clone()),
            ("className".to_string(), self.class_name.clone()),
            ("version".to_string(), self.version.clone()),
            (
                "description".to_string(),
                self.description.clone().unwrap_or_default(),
            ),
        ])
    }
}

fn validate_name(value: &str) -> std::result::Result<(), String> {
    if is_valid_filename(value.trim()) {
        Ok(())
    } else {
        Err("Please enter a valid name".to_string())
    }
}

fn normalize_version(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_start_matches(['v', '=']);
    semver::Version::parse(trimmed).ok().map(|v| v.to_string())
}

fn validate_version(value: &str) -> std::result::Result<(), String> {
    normalize_version(value)
        .map(|_| ())
        .ok_or_else(|| "Please enter a valid version, e.g. 1.0.0".to_string())
}

fn validate_not_blank(value: &str) -> std::result::Result<(), String> {
    if value.trim().is_empty() {
        Err("This field is required".to_string())
    } else {
        Ok(())
    }
}

/// Creates a project or component from a template package.
pub struct InitManager<'a, P, R> {
    config: &'a CliConfig,
    prompter: P,
    registry: R,
}

impl<'a, P: Prompter, R: Registry + Clone> InitManager<'a, P, R> {
    pub const fn new(config: &'a CliConfig, prompter: P, registry: R) -> Self {
        Self {
            config,
            prompter,
            registry,
        }
    }

    pub async fn exec(&self, options: &InitOptions) -> Result<()> {
        let Some(info) = self.prepare(options)? else {
            stencil_logger::info("Nothing was created");
            return Ok(());
        };
        stencil_logger::verbose("projectInfo", &format!("{info:?}"));

        let pkg = self.download_template(&info.template).await?;
        Self::install_template(&pkg, &info, options)
    }

    /// Checks the project directory and collects the project information.
    /// `None` means the user backed out.
    pub fn prepare(&self, options: &InitOptions) -> Result<Option<ProjectInfo>> {
        let catalog = load_catalog(&self.config.cli_home)?;
        if catalog.is_empty() {
            return Err(StencilError::TemplateNotFound(
                "the template catalog is empty".to_string(),
            ));
        }

        let project_dir = &options.project_dir;
        ensure_dir_exists(project_dir)?;

        if !is_dir_empty(project_dir)? {
            if !options.force
                && !self.prompter.confirm(
                    "The current directory is not empty. Continue creating the project here?",
                    false,
                )?
            {
                return Ok(None);
            }

            if self.prompter.confirm(
                "Delete every file in the current directory before continuing?",
                false,
            )? {
                stencil_logger::status("Emptying the project directory...");
                empty_dir(project_dir)?;
            }
        }

        self.get_project_info(&catalog, options).map(Some)
    }

    fn get_project_info(
        &self,
        catalog: &[TemplateInfo],
        options: &InitOptions,
    ) -> Result<ProjectInfo> {
        let kind = self.prompter.select(
            "What do you want to create?",
            &[
                Choice::new("Project", TYPE_PROJECT),
                Choice::new("Component", TYPE_COMPONENT),
            ],
        )?;
        stencil_logger::verbose("type", &kind);

        let templates = templates_for(catalog, &kind);
        if templates.is_empty() {
            return Err(StencilError::TemplateNotFound(format!(
                "no {kind} templates are available"
            )));
        }

        let label = if kind == TYPE_COMPONENT { "Component" } else { "Project" };

        let project_name = match options
            .project_name
            .as_deref()
            .filter(|name| validate_name(name).is_ok())
        {
            Some(name) => name.trim().to_string(),
            None => self
                .prompter
                .input(&format!("{label} name"), None, validate_name)?
                .trim()
                .to_string(),
        };

        let version = self
            .prompter
            .input(&format!("{label} version"), Some("1.0.0"), validate_version)?;
        let version = normalize_version(&version)
            .ok_or_else(|| StencilError::Prompt(format!("invalid version '{version}'")))?;

        let description = if kind == TYPE_COMPONENT {
            Some(
                self.prompter
                    .input("Component description", None, validate_not_blank)?
                    .trim()
                    .to_string(),
            )
        } else {
            None
        };

        let choices: Vec<Choice> = templates
            .iter()
            .map(|t| Choice::new(&t.name, &t.npm_name))
            .collect();
        let npm_name = self
            .prompter
            .select(&format!("Select a {kind} template"), &choices)?;
        let template = templates
            .into_iter()
            .find(|t| t.npm_name == npm_name)
            .ok_or_else(|| StencilError::TemplateNotFound(npm_name.clone()))?;

        Ok(ProjectInfo {
            class_name: kebab_case(&project_name),
            kind,
            project_name,
            version,
            description,
            template,
        })
    }

    /// Makes the template package available locally: the configured target
    /// path as is, otherwise installed or updated in the template store.
    pub async fn download_template(&self, template: &TemplateInfo) -> Result<Package<R>> {
        if let Some(target_path) = &self.config.target_path {
            let mut pkg = Package::new(
                PackageOptions {
                    target_path: target_path.clone(),
                    store_dir: None,
                    package_name: template.npm_name.clone(),
                    package_version: template.version.clone(),
                },
                self.registry.clone(),
            )?;

            if !pkg.exists().await? {
                return Err(StencilError::TemplateNotFound(format!(
                    "{} does not exist",
                    target_path.display()
                )));
            }
            stencil_logger::verbose("targetPath", &pkg.target_path().display().to_string());
            return Ok(pkg);
        }

        let target_path = self.config.template_target_path();
        let store_dir = self.config.template_store_dir();
        stencil_logger::verbose("storeDir", &store_dir.display().to_string());

        let mut pkg = Package::new(
            PackageOptions {
                target_path,
                store_dir: Some(store_dir),
                package_name: template.npm_name.clone(),
                package_version: template.version.clone(),
            },
            self.registry.clone(),
        )?;

        if pkg.exists().await? {
            stencil_logger::status(&format!("Updating template {}...", template.npm_name));
            pkg.update().await?;
            stencil_logger::success("Template is up to date");
        } else {
            stencil_logger::status(&format!("Downloading template {}...", template.npm_name));
            pkg.install().await?;
            stencil_logger::success("Template downloaded");
        }

        Ok(pkg)
    }

    pub fn install_template(
        pkg: &Package<R>,
        info: &ProjectInfo,
        options: &InitOptions,
    ) -> Result<()> {
        match info.template.kind {
            TemplateKind::Normal => Self::install_normal_template(pkg, info, options),
            TemplateKind::Custom => Self::install_custom_template(pkg),
        }
    }

    fn install_normal_template(
        pkg: &Package<R>,
        info: &ProjectInfo,
        options: &InitOptions,
    ) -> Result<()> {
        let root = pkg.root_dir().ok_or_else(|| {
            StencilError::TemplateNotFound(format!("{} is not resolved", pkg.package_name()))
        })?;
        let source = template_source_dir(&root);
        let project_dir = &options.project_dir;

        stencil_logger::status("Copying template files...");
        fs_extra::dir::copy(
            &source,
            project_dir,
            &fs_extra::dir::CopyOptions::new()
                .overwrite(true)
                .content_only(true),
        )
        .map_err(|e| StencilError::IoError(format!("failed to copy template: {e}")))?;

        let ignore: Vec<String> = DEFAULT_RENDER_IGNORE
            .iter()
            .map(|glob| (*glob).to_string())
            .chain(info.template.ignore.iter().cloned())
            .collect();
        let rendered = render_dir(
            project_dir,
            &ignore,
            &PlaceholderRenderer,
            &info.render_context(),
        )?;
        stencil_logger::verbose("rendered files", &rendered.to_string());
        stencil_logger::finish(&format!("Created {} from {}", info.project_name, info.template.name));

        if options.skip_install {
            return Ok(());
        }

        for command in [&info.template.install_command, &info.template.start_command]
            .into_iter()
            .flatten()
        {
            stencil_runtime::run_command(project_dir, command)?;
        }

        Ok(())
    }

    fn install_custom_template(pkg: &Package<R>) -> Result<()> {
        let entry = pkg.get_root_file_path().ok_or_else(|| {
            StencilError::TemplateNotFound(format!(
                "custom template {} declares no entry file",
                pkg.package_name()
            ))
        })?;

        stencil_logger::info(&format!(
            "{} ships its own installer: {}",
            pkg.package_name(),
            entry.display()
        ));
        stencil_logger::warn("Custom installers are not run by stencil");
        Ok(())
    }
}

/// Templates keep their files in a `template/` directory when they have one.
fn template_source_dir(root: &Path) -> PathBuf {
    let nested = root.join("template");
    if nested.is_dir() { nested } else { root.to_path_buf() }
}
