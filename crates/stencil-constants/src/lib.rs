pub const DESCRIPTION: &str = "Scaffold new projects and components from registry templates";
pub const BIN_NAME: &str = "stencil";

pub const USER_AGENT: &str = "stencil/0.1.0";
pub const MAX_ATTEMPTS: u32 = 4;

pub const NPM_REGISTRY: &str = "https://registry.npmjs.org";
pub const MIRROR_REGISTRY: &str = "https://registry.npmmirror.com";

/// Directory under the user home used when no cli home is configured.
pub const DEFAULT_CLI_HOME: &str = ".stencil";
/// Subdirectory of the cli home holding downloaded template packages.
pub const TEMPLATE_CACHE_DIR: &str = "template";
/// Subdirectory of the cli home holding packages added through `stencil cache`.
pub const DEPENDENCIES_CACHE_DIR: &str = "dependencies";
pub const STORE_DIR: &str = "node_modules";
pub const TEMPLATE_CATALOG_FILE: &str = "templates.json";
pub const MANIFEST_FILE: &str = "package.json";

pub const LATEST_TAG: &str = "latest";

/// Programs a template may ask to run after installation.
pub const WHITE_COMMANDS: &[&str] = &["npm", "cnpm", "yarn", "pnpm"];

/// Globs never rendered by the template engine.
pub const DEFAULT_RENDER_IGNORE: &[&str] = &["**/node_modules/**", "**/*.png", "**/*.jpg", "**/*.ico"];

pub const TYPE_PROJECT: &str = "project";
pub const TYPE_COMPONENT: &str = "component";

/// (display name, package name, version, install command, start command)
pub const BUILTIN_TEMPLATES: &[(&str, &str, &str, &str, &str)] = &[
    (
        "Vue 3 standard project",
        "stencil-template-vue3",
        "latest",
        "npm install",
        "npm run serve",
    ),
    (
        "React standard project",
        "stencil-template-react",
        "latest",
        "npm install",
        "npm start",
    ),
];

