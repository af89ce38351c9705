use crate::config::WebTextConfig;
use crate::error::Result;
use crate::session::{By, Element, Session};
use fantoccini::error::NewSessionError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Value, json};

/// WebDriver servers tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 2] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// A headless browser driven over the WebDriver protocol
///
/// Dropping the session without calling [`WebDriverSession::close`] still ends
/// the WebDriver session once the client's connection task shuts down.
pub struct WebDriverSession {
    client: Client,
}

impl WebDriverSession {
    /// Start a headless browser with a fixed viewport and a desktop user agent
    ///
    /// Unless the configuration names a user agent, a throwaway session is
    /// opened first to read the engine's default one.
    pub async fn launch(config: &WebTextConfig) -> Result<Self> {
        let user_agent = match &config.user_agent {
            Some(user_agent) => user_agent.clone(),
            None => probe_user_agent(config).await?,
        };
        ::log::debug!("Using user agent: {}", user_agent);

        let caps = capabilities(config, Some(&user_agent));
        let client = connect(&config.webdriver_url, caps).await?;

        let resized = client
            .set_window_size(config.window_width, config.window_height)
            .await;
        if let Err(e) = resized {
            if let Err(close_err) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", close_err);
            }
            return Err(e.into());
        }

        ::log::info!(
            "Browser ready ({}x{}) via {}",
            config.window_width,
            config.window_height,
            config.webdriver_url
        );
        Ok(Self { client })
    }

    /// End the WebDriver session
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        ::log::debug!("WebDriver session closed");
        Ok(())
    }
}

impl Session for WebDriverSession {
    type Element = WebDriverElement;

    async fn goto(&mut self, url: &str) -> Result<()> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn title(&mut self) -> Result<String> {
        Ok(self.client.title().await?)
    }

    async fn find(&mut self, by: &By) -> Result<WebDriverElement> {
        let element = self.client.find(locator(by)).await?;
        Ok(WebDriverElement(element))
    }

    async fn find_all(&mut self, by: &By) -> Result<Vec<WebDriverElement>> {
        let elements = self.client.find_all(locator(by)).await?;
        Ok(elements.into_iter().map(WebDriverElement).collect())
    }
}

/// An element of a page loaded in a [`WebDriverSession`]
pub struct WebDriverElement(fantoccini::elements::Element);

impl Element for WebDriverElement {
    /// Reads the markup attribute. A non-empty `href` is read back through
    /// the DOM property so that it comes back resolved against the page.
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let raw = self.0.attr(name).await?;
        if !resolves_through_property(name, raw.as_deref()) {
            return Ok(raw);
        }
        Ok(self.0.prop(name).await?.or(raw))
    }

    async fn text(&self) -> Result<String> {
        Ok(self.0.text().await?)
    }
}

fn resolves_through_property(name: &str, raw: Option<&str>) -> bool {
    name == "href" && raw.is_some_and(|value| !value.is_empty())
}

fn locator(by: &By) -> Locator<'_> {
    match by {
        By::Tag(name) => Locator::Css(name),
        By::Css(selector) => Locator::Css(selector),
        By::Id(id) => Locator::Id(id),
        By::XPath(path) => Locator::XPath(path),
    }
}

/// Chrome capabilities for the configured browser
pub fn capabilities(config: &WebTextConfig, user_agent: Option<&str>) -> Capabilities {
    let mut args = Vec::new();
    if config.headless {
        args.push("--headless".to_string());
    }
    args.push(format!(
        "--window-size={},{}",
        config.window_width, config.window_height
    ));
    if let Some(user_agent) = user_agent {
        args.push(format!("--user-agent={user_agent}"));
    }

    let mut caps = Capabilities::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// Removes the headless marker from a browser's user agent
pub fn desktop_user_agent(user_agent: &str) -> String {
    user_agent.replace("headless", "").replace("Headless", "")
}

/// Reads the engine's default user agent from a short-lived session
async fn probe_user_agent(config: &WebTextConfig) -> Result<String> {
    let client = connect(&config.webdriver_url, capabilities(config, None)).await?;
    let probed = client
        .execute("return navigator.userAgent", Vec::new())
        .await;

    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close user agent probe session: {}", e);
    }

    let user_agent = match probed? {
        Value::String(user_agent) => user_agent,
        other => {
            ::log::warn!("Unexpected user agent value: {}", other);
            String::new()
        }
    };
    Ok(desktop_user_agent(&user_agent))
}

/// Connects to the WebDriver server, trying common alternatives on failure
async fn connect(webdriver_url: &str, capabilities: Capabilities) -> Result<Client> {
    let first_error = match new_client(webdriver_url, capabilities.clone()).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS {
        if url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = new_client(url, capabilities.clone()).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(first_error.into())
}

async fn new_client(
    webdriver_url: &str,
    capabilities: Capabilities,
) -> std::result::Result<Client, NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities);
    builder.connect(webdriver_url).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_user_agent() {
        let raw = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) HeadlessChrome/120.0.0.0 Safari/537.36";
        assert_eq!(
            desktop_user_agent(raw),
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        );
        assert_eq!(desktop_user_agent("Mozilla/5.0 headless"), "Mozilla/5.0 ");
        assert_eq!(desktop_user_agent("Mozilla/5.0"), "Mozilla/5.0");
    }

    #[test]
    fn test_capabilities() {
        let config = WebTextConfig::default();
        let caps = capabilities(&config, Some("Mozilla/5.0 Chrome/120"));
        assert_eq!(
            caps["goog:chromeOptions"],
            json!({
                "args": [
                    "--headless",
                    "--window-size=1920,1080",
                    "--user-agent=Mozilla/5.0 Chrome/120"
                ]
            })
        );

        let config = WebTextConfig {
            headless: false,
            window_width: 1280,
            window_height: 720,
            ..WebTextConfig::default()
        };
        let caps = capabilities(&config, None);
        assert_eq!(
            caps["goog:chromeOptions"],
            json!({ "args": ["--window-size=1280,720"] })
        );
    }

    #[test]
    fn test_only_href_resolves_through_property() {
        assert!(resolves_through_property("href", Some("/one")));
        assert!(resolves_through_property("href", Some("https://example.com/")));

        // An empty or missing href stays as written
        assert!(!resolves_through_property("href", Some("")));
        assert!(!resolves_through_property("href", None));

        // Meta content and alt text are read from the markup only
        assert!(!resolves_through_property("content", None));
        assert!(!resolves_through_property("content", Some("")));
        assert!(!resolves_through_property("alt", Some("Logo")));
        assert!(!resolves_through_property("title", Some("Home")));
    }

    #[test]
    fn test_locator() {
        assert!(matches!(locator(&By::tag("a")), Locator::Css("a")));
        assert!(matches!(locator(&By::css("a.post-link")), Locator::Css("a.post-link")));
        assert!(matches!(locator(&By::Id("main".into())), Locator::Id("main")));
        assert!(matches!(locator(&By::XPath("//a".into())), Locator::XPath("//a")));
    }
}
