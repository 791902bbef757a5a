//! Plan file fixtures.

/// A plan with an app, a test bundle importing the app's headers, and two
/// dependency targets, one of them active in Debug only.
pub const BASIC_PLAN: &str = r#"
[project]
path = "App.xcodeproj"
targets = [
    { uuid = "APP", name = "App", product_type = "application" },
    { uuid = "TESTS", name = "AppTests", product_type = "com.apple.product-type.bundle.unit-test" },
]

[[pod_targets]]
name = "Alamofire"
platform = { name = "ios", deployment_target = "12.0" }
uses_swift = true
specs = [{ name = "Alamofire", version = "5.8.0", frameworks = ["CFNetwork"] }]
resources = { Alamofire = ["Alamofire/PrivacyInfo.xcprivacy"] }

[[pod_targets]]
name = "Debugger"
platform = { name = "ios", deployment_target = "12.0" }
specs = [{ name = "Debugger", version = "1.2.0", libraries = ["z"] }]

[[targets]]
name = "App"
platform = { name = "ios", deployment_target = "12.0" }
defined_in_file = "Podfile"
archs = ["arm64"]
host_targets = ["APP"]
dependencies = { Debug = ["Alamofire", "Debugger"], Release = ["Alamofire"] }

[[targets]]
name = "AppTests"
platform = { name = "ios", deployment_target = "12.0" }
host_targets = ["TESTS"]
search_paths = ["App"]
"#;

/// Builder for small plan files.
#[derive(Debug, Clone, Default)]
pub struct PlanFixture {
    project: Option<String>,
    pod_targets: Vec<String>,
    targets: Vec<String>,
}

impl PlanFixture {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project with `(uuid, product_type)` native targets.
    pub fn project(mut self, targets: &[(&str, &str)]) -> Self {
        let entries: Vec<String> = targets
            .iter()
            .map(|(uuid, kind)| {
                format!(
                    r#"{{ uuid = "{uuid}", name = "{uuid}", product_type = "{kind}" }}"#
                )
            })
            .collect();
        self.project = Some(format!(
            "[project]\npath = \"App.xcodeproj\"\ntargets = [{}]\n",
            entries.join(", ")
        ));
        self
    }

    /// Add a buildable dependency target with one spec.
    pub fn pod_target(mut self, name: &str) -> Self {
        self.pod_targets.push(format!(
            r#"[[pod_targets]]
name = "{name}"
platform = {{ name = "ios" }}
specs = [{{ name = "{name}", version = "1.0.0" }}]
"#
        ));
        self
    }

    /// Add a definition; `dependencies` is the body of an inline table.
    pub fn target(mut self, name: &str, dependencies: &str) -> Self {
        self.targets.push(format!(
            r#"[[targets]]
name = "{name}"
platform = {{ name = "ios" }}
dependencies = {{ {dependencies} }}
"#
        ));
        self
    }

    /// Add a definition integrating with the given host targets.
    pub fn target_with_hosts(mut self, name: &str, uuids: &[&str]) -> Self {
        let uuids: Vec<String> = uuids.iter().map(|u| format!("\"{}\"", u)).collect();
        self.targets.push(format!(
            r#"[[targets]]
name = "{name}"
platform = {{ name = "ios" }}
host_targets = [{}]
"#,
            uuids.join(", ")
        ));
        self
    }

    /// Render the plan as TOML.
    pub fn build(&self) -> String {
        let mut out = String::new();
        if let Some(ref project) = self.project {
            out.push_str(project);
            out.push('\n');
        }
        for section in self.pod_targets.iter().chain(&self.targets) {
            out.push_str(section);
            out.push('\n');
        }
        out
    }
}
