//! Static project metadata and placeholder files.

use crate::config::ProjectConfig;

pub const PROPERTIES_PATH: &str = "youngandroidproject/project.properties";
pub const ASSETS_README_PATH: &str = "assets/README.txt";
pub const BUILD_README_PATH: &str = "build/README.txt";

pub const ASSETS_README: &str = "This is the assets folder for your project.\n\n\
Any files you add here will be packaged with your application.\n\n\
If you have media files that you want to use in your app, copy them to this folder.";

pub const BUILD_README: &str = "This is the build folder for your project.\n\n\
Files in this folder are generated automatically by App Inventor.\n\n\
Do not edit the files in this folder.";

pub fn project_properties(project: &ProjectConfig) -> String {
    [
        format!("main={}", project.main_class()),
        format!("name={}", project.name),
        "assets=../assets".to_string(),
        "source=../src".to_string(),
        "build=../build".to_string(),
        "versioncode=1".to_string(),
        "versionname=1.0".to_string(),
        "useslocation=False".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_properties() {
        let text = project_properties(&ProjectConfig::default());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "main=appinventor.ai_anonymous.ConvertedApp.Screen1");
        assert_eq!(lines[1], "name=ConvertedApp");
        assert_eq!(lines.len(), 8);
        assert!(!text.ends_with('\n'));
    }
}
