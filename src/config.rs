use serde::Deserialize;

fn def_http_port() -> u16 {
    3000
}

fn def_app_development() -> bool {
    false
}

fn def_upload_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    /// If the application is running in `development` mode
    #[serde(default = "def_app_development")]
    pub app_development: bool,

    #[serde(default = "def_http_port")]
    pub http_port: u16,

    /// name of the S3 bucket uploaded car images are stored into
    pub aws_uploads_bucket_name: String,

    /// public base URL uploaded images are served from, eg: `https://cdn.example.com`
    pub uploads_cdn_base_url: String,

    /// max seconds to wait for a single image upload to the asset host
    #[serde(default = "def_upload_timeout_secs")]
    pub upload_timeout_secs: u64,
}

impl AppConfig {
    /// loads the config from the environment variables
    ///
    /// # PANICS
    /// panics if the environment variables could not be loaded, such as when a string value
    /// cannot be parsed to the desired data type, eg:
    ///
    /// ENV_VAR_THAT_SHOULD_BE_BOOL=not_a_bool
    pub fn from_env() -> AppConfig {
        match envy::from_env::<AppConfig>() {
            Ok(config) => {
                if config.app_development {
                    println!("[CFG] {:#?}", config);
                }

                config
            }

            Err(error) => {
                panic!("[ENV] failed to load application config, {:#?}", error)
            }
        }
    }
}
