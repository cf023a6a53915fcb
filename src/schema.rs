//! The settings schema: typed structs, compiled defaults, and the tagged
//! description the reader walks.
//!
//! The structs are the typed view callers consume. Defaults live on the
//! fields as confique `#[config(default = ...)]` attributes, so
//! [`Settings::defaults`] always produces a total object. Serialized key
//! names follow the host's JSON keys (`codeFormatting.preset`).
//!
//! [`SETTINGS`] describes the same tree with an explicit [`FieldKind`] per
//! field. The reader never inspects runtime value shapes: a field tagged
//! [`FieldKind::Map`] is queried as a single value even though it is an
//! object, because the host can only replace it as a whole.

use std::collections::BTreeMap;

use confique::Config;
use serde::{Deserialize, Serialize};

// -- Enumerations -----------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeFormattingPreset {
    Custom,
    Allman,
    #[serde(rename = "OTBS")]
    Otbs,
    Stroustrup,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineIndentationStyle {
    IncreaseIndentationForFirstPipeline,
    IncreaseIndentationAfterEveryPipeline,
    NoIndentation,
    None,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Diagnostic,
    Verbose,
    Normal,
    Warning,
    Error,
    None,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentType {
    Disabled,
    BlockComment,
    LineComment,
}

// -- Settings structs -------------------------------------------------------

/// All settings of the `powershell` section.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Additional PowerShell executables, keyed by display name.
    #[config(default = {})]
    pub power_shell_additional_exe_paths: BTreeMap<String, String>,

    #[config(default = "")]
    pub power_shell_default_version: String,

    #[config(default = true)]
    pub prompt_to_update_power_shell: bool,

    #[config(default = false)]
    pub suppress_additional_exe_not_found_warning: bool,

    #[config(nested)]
    pub start_as_login_shell: StartAsLoginShellSettings,

    #[config(default = true)]
    pub start_automatically: bool,

    #[config(default = true)]
    pub enable_profile_loading: bool,

    #[config(default = "BlockComment")]
    pub help_completion: CommentType,

    #[config(nested)]
    pub script_analysis: ScriptAnalysisSettings,

    #[config(nested)]
    pub debugging: DebuggingSettings,

    #[config(nested)]
    pub developer: DeveloperSettings,

    #[config(nested)]
    pub code_formatting: CodeFormattingSettings,

    #[config(nested)]
    pub integrated_console: IntegratedConsoleSettings,

    #[config(nested)]
    pub side_bar: SideBarSettings,

    #[config(nested)]
    pub pester: PesterSettings,

    #[config(nested)]
    pub buttons: ButtonSettings,

    /// Raw `cwd` setting. Empty means unset.
    ///
    /// Use [`Session::resolve_cwd`](crate::Session::resolve_cwd) rather than
    /// reading this directly.
    #[config(default = "")]
    pub cwd: String,

    #[config(default = true)]
    pub enable_references_code_lens: bool,

    #[config(default = false)]
    pub analyze_open_documents_only: bool,
}

impl Settings {
    /// The host configuration section all keys are relative to.
    pub const SECTION: &'static str = "powershell";

    /// A fresh, fully populated instance holding only compiled defaults.
    ///
    /// Every call builds a new value; nothing is shared between instances.
    pub fn defaults() -> Self {
        Self::builder()
            .load()
            .expect("pwsh-settings: every setting carries a compiled default")
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults()
    }
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StartAsLoginShellSettings {
    #[config(default = true)]
    pub osx: bool,

    #[config(default = false)]
    pub linux: bool,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScriptAnalysisSettings {
    #[config(default = true)]
    pub enable: bool,

    #[config(default = "PSScriptAnalyzerSettings.psd1")]
    pub settings_path: String,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DebuggingSettings {
    #[config(default = false)]
    pub create_temporary_integrated_console: bool,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperSettings {
    #[config(default = [])]
    pub feature_flags: Vec<String>,

    #[config(default = "Normal")]
    pub editor_services_log_level: LogLevel,

    #[config(default = false)]
    pub editor_services_wait_for_debugger: bool,

    #[config(default = true)]
    pub set_execution_policy: bool,

    /// Relative to the extension's install directory.
    #[config(default = "../../../PowerShellEditorServices/module")]
    pub bundled_modules_path: String,

    #[config(default = 240)]
    pub wait_for_session_file_timeout_seconds: u32,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeFormattingSettings {
    #[config(default = false)]
    pub auto_correct_aliases: bool,

    #[config(default = false)]
    pub avoid_semicolons_as_line_terminators: bool,

    /// When not `Custom`, overrides the brace placement settings below.
    #[config(default = "Custom")]
    pub preset: CodeFormattingPreset,

    #[config(default = true)]
    pub open_brace_on_same_line: bool,

    #[config(default = true)]
    pub new_line_after_open_brace: bool,

    #[config(default = true)]
    pub new_line_after_close_brace: bool,

    #[config(default = "NoIndentation")]
    pub pipeline_indentation_style: PipelineIndentationStyle,

    #[config(default = true)]
    pub whitespace_before_open_brace: bool,

    #[config(default = true)]
    pub whitespace_before_open_paren: bool,

    #[config(default = true)]
    pub whitespace_around_operator: bool,

    #[config(default = true)]
    pub whitespace_after_separator: bool,

    #[config(default = false)]
    pub whitespace_between_parameters: bool,

    #[config(default = true)]
    pub whitespace_inside_brace: bool,

    #[config(default = true)]
    pub add_whitespace_around_pipe: bool,

    #[config(default = false)]
    pub trim_whitespace_around_pipe: bool,

    #[config(default = true)]
    pub ignore_one_line_block: bool,

    #[config(default = true)]
    pub align_property_value_pairs: bool,

    #[config(default = false)]
    pub use_constant_strings: bool,

    #[config(default = false)]
    pub use_correct_casing: bool,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntegratedConsoleSettings {
    #[config(default = true)]
    pub show_on_startup: bool,

    #[config(default = false)]
    pub start_in_background: bool,

    #[config(default = true)]
    pub focus_console_on_execute: bool,

    #[config(default = false)]
    pub use_legacy_read_line: bool,

    #[config(default = false)]
    pub force_clear_scrollback_buffer: bool,

    #[config(default = false)]
    pub suppress_startup_banner: bool,
}

/// The host spells these two keys in PascalCase.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SideBarSettings {
    #[serde(rename = "CommandExplorerVisibility")]
    #[config(default = false)]
    pub command_explorer_visibility: bool,

    #[serde(rename = "CommandExplorerExcludeFilter")]
    #[config(default = [])]
    pub command_explorer_exclude_filter: Vec<String>,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PesterSettings {
    #[config(default = true)]
    pub use_legacy_code_lens: bool,

    #[config(default = "FromPreference")]
    pub output_verbosity: String,

    #[config(default = "Diagnostic")]
    pub debug_output_verbosity: String,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ButtonSettings {
    #[config(default = true)]
    pub show_run_buttons: bool,

    #[config(default = false)]
    pub show_panel_movement_buttons: bool,
}

// -- Tagged schema description ----------------------------------------------

/// A group of settings: the top-level section or a nested object.
#[derive(Debug)]
pub struct Section {
    pub fields: &'static [Field],
}

/// One named entry of a [`Section`].
#[derive(Debug)]
pub struct Field {
    /// JSON key, as the host spells it.
    pub key: &'static str,
    /// One-line description shown by `get`.
    pub doc: &'static str,
    pub kind: FieldKind,
}

#[derive(Debug)]
pub enum FieldKind {
    /// A primitive, enum, or sequence value.
    Leaf,
    /// An open string-to-string mapping, read and written as one value.
    Map,
    /// A nested group, addressed as `<key>.<field>`.
    Nested(&'static Section),
}

const fn leaf(key: &'static str, doc: &'static str) -> Field {
    Field {
        key,
        doc,
        kind: FieldKind::Leaf,
    }
}

const fn map(key: &'static str, doc: &'static str) -> Field {
    Field {
        key,
        doc,
        kind: FieldKind::Map,
    }
}

const fn nested(key: &'static str, doc: &'static str, section: &'static Section) -> Field {
    Field {
        key,
        doc,
        kind: FieldKind::Nested(section),
    }
}

impl Section {
    /// All leaf paths (including [`FieldKind::Map`] fields) in declaration order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaf_paths(self, "", &mut paths);
        paths
    }

    /// Find the field a dotted path names. Section paths resolve to their
    /// [`FieldKind::Nested`] field; paths below a map field do not resolve.
    pub fn lookup(&self, dotted_key: &str) -> Option<&Field> {
        let mut section = self;
        let mut segments = dotted_key.split('.').peekable();
        while let Some(segment) = segments.next() {
            let field = section.fields.iter().find(|f| f.key == segment)?;
            if segments.peek().is_none() {
                return Some(field);
            }
            match &field.kind {
                FieldKind::Nested(inner) => section = *inner,
                FieldKind::Leaf | FieldKind::Map => return None,
            }
        }
        None
    }

    pub fn contains(&self, dotted_key: &str) -> bool {
        self.lookup(dotted_key).is_some()
    }
}

/// Join a path prefix and a key with `.`.
pub(crate) fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn collect_leaf_paths(section: &Section, prefix: &str, paths: &mut Vec<String>) {
    for field in section.fields {
        let path = dotted(prefix, field.key);
        match &field.kind {
            FieldKind::Leaf | FieldKind::Map => paths.push(path),
            FieldKind::Nested(inner) => collect_leaf_paths(inner, &path, paths),
        }
    }
}

static START_AS_LOGIN_SHELL: Section = Section {
    fields: &[
        leaf("osx", "Start the PowerShell process with -Login on macOS."),
        leaf("linux", "Start the PowerShell process with -Login on Linux."),
    ],
};

static SCRIPT_ANALYSIS: Section = Section {
    fields: &[
        leaf("enable", "Run PSScriptAnalyzer on open scripts."),
        leaf(
            "settingsPath",
            "Path to a PSScriptAnalyzer settings file, relative to the workspace.",
        ),
    ],
};

static DEBUGGING: Section = Section {
    fields: &[leaf(
        "createTemporaryIntegratedConsole",
        "Start a fresh console for each debugging session.",
    )],
};

static DEVELOPER: Section = Section {
    fields: &[
        leaf("featureFlags", "Feature flags passed to PowerShell Editor Services."),
        leaf("editorServicesLogLevel", "Log level of PowerShell Editor Services."),
        leaf(
            "editorServicesWaitForDebugger",
            "Make PowerShell Editor Services wait for a debugger at startup.",
        ),
        leaf("setExecutionPolicy", "Set the execution policy of the session on startup."),
        leaf(
            "bundledModulesPath",
            "Path to the modules bundled with the extension.",
        ),
        leaf(
            "waitForSessionFileTimeoutSeconds",
            "Seconds to wait for the language server to write its session file.",
        ),
    ],
};

static CODE_FORMATTING: Section = Section {
    fields: &[
        leaf("autoCorrectAliases", "Replace aliases with full command names."),
        leaf(
            "avoidSemicolonsAsLineTerminators",
            "Remove semicolons used as line terminators.",
        ),
        leaf("preset", "Formatting preset; anything but Custom overrides brace rules."),
        leaf("openBraceOnSameLine", "Place open braces on the same line as the statement."),
        leaf("newLineAfterOpenBrace", "Add a new line after an open brace."),
        leaf("newLineAfterCloseBrace", "Add a new line after a close brace."),
        leaf("pipelineIndentationStyle", "How multi-line pipelines are indented."),
        leaf("whitespaceBeforeOpenBrace", "Add a space before an open brace."),
        leaf("whitespaceBeforeOpenParen", "Add a space between a keyword and a parenthesis."),
        leaf("whitespaceAroundOperator", "Add spaces around binary and assignment operators."),
        leaf("whitespaceAfterSeparator", "Add a space after commas and semicolons."),
        leaf("whitespaceBetweenParameters", "Collapse repeated spaces between parameters."),
        leaf("whitespaceInsideBrace", "Add spaces inside braces."),
        leaf("addWhitespaceAroundPipe", "Add spaces around the pipe operator."),
        leaf("trimWhitespaceAroundPipe", "Trim extra spaces around the pipe operator."),
        leaf("ignoreOneLineBlock", "Leave one-line script blocks untouched."),
        leaf("alignPropertyValuePairs", "Align assignments in hashtables and DSC blocks."),
        leaf("useConstantStrings", "Use single quotes for strings without expansion."),
        leaf("useCorrectCasing", "Fix the casing of commands and parameters."),
    ],
};

static INTEGRATED_CONSOLE: Section = Section {
    fields: &[
        leaf("showOnStartup", "Show the extension terminal when the extension starts."),
        leaf("startInBackground", "Start the extension terminal hidden."),
        leaf("focusConsoleOnExecute", "Focus the terminal when running code."),
        leaf("useLegacyReadLine", "Use the legacy ReadLine instead of PSReadLine."),
        leaf(
            "forceClearScrollbackBuffer",
            "Clear the scrollback buffer along with the screen.",
        ),
        leaf("suppressStartupBanner", "Hide the startup banner."),
    ],
};

static SIDE_BAR: Section = Section {
    fields: &[
        leaf("CommandExplorerVisibility", "Show the command explorer."),
        leaf(
            "CommandExplorerExcludeFilter",
            "Modules whose commands the command explorer hides.",
        ),
    ],
};

static PESTER: Section = Section {
    fields: &[
        leaf("useLegacyCodeLens", "Use the code lens of Pester 4 and below."),
        leaf("outputVerbosity", "Pester output verbosity when running tests."),
        leaf("debugOutputVerbosity", "Pester output verbosity when debugging tests."),
    ],
};

static BUTTONS: Section = Section {
    fields: &[
        leaf("showRunButtons", "Show the run and run selection buttons."),
        leaf("showPanelMovementButtons", "Show the panel movement buttons."),
    ],
};

/// Tagged description of [`Settings`].
pub static SETTINGS: Section = Section {
    fields: &[
        map(
            "powerShellAdditionalExePaths",
            "Additional PowerShell executables, keyed by display name.",
        ),
        leaf(
            "powerShellDefaultVersion",
            "Display name of the PowerShell executable to start by default.",
        ),
        leaf("promptToUpdatePowerShell", "Offer to update PowerShell when it is outdated."),
        leaf(
            "suppressAdditionalExeNotFoundWarning",
            "Do not warn about additional executables that are missing.",
        ),
        nested(
            "startAsLoginShell",
            "Start PowerShell as a login shell.",
            &START_AS_LOGIN_SHELL,
        ),
        leaf("startAutomatically", "Start the language server when a script is opened."),
        leaf("enableProfileLoading", "Load PowerShell profiles at startup."),
        leaf("helpCompletion", "Style of comment-based help inserted by completion."),
        nested("scriptAnalysis", "Script analysis settings.", &SCRIPT_ANALYSIS),
        nested("debugging", "Debugger settings.", &DEBUGGING),
        nested("developer", "Settings for extension development.", &DEVELOPER),
        nested("codeFormatting", "Code formatting settings.", &CODE_FORMATTING),
        nested("integratedConsole", "Extension terminal settings.", &INTEGRATED_CONSOLE),
        nested("sideBar", "Side bar settings.", &SIDE_BAR),
        nested("pester", "Pester integration settings.", &PESTER),
        nested("buttons", "Editor title button settings.", &BUTTONS),
        leaf("cwd", "Working directory of the extension terminal."),
        leaf("enableReferencesCodeLens", "Show reference counts above functions."),
        leaf("analyzeOpenDocumentsOnly", "Only analyze documents that are open."),
    ],
};
