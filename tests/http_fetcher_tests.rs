//! End-to-end tests over the reqwest fetcher
//!
//! These tests use wiremock to create mock HTTP servers and run full crawls
//! against them with the proxy disabled.

use osint_linktree::config::{CrawlOptions, ProxyConfig, UserAgentConfig};
use osint_linktree::recon::{check_tor, investigate, ProbeOutcome};
use osint_linktree::{Crawler, FetchError, HttpFetcher, PageFetcher, PageState, ReconError};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_fetcher() -> HttpFetcher {
    let user_agent = UserAgentConfig {
        crawler_name: "TestCrawler".to_string(),
        crawler_version: "1.0".to_string(),
    };
    let proxy = ProxyConfig {
        enabled: false,
        ..ProxyConfig::default()
    };
    HttpFetcher::new(&user_agent, &proxy).expect("Failed to build fetcher")
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_against_mock_site() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
                <a href="{base}/about">About</a>
                <a href="{base}/missing">Missing</a>
                <a href="/relative">ignored</a>
                <a href="mailto:owner@site.test">mail</a>
            </body></html>"#
        ),
    )
    .await;
    mount_html(
        &server,
        "/about",
        format!(
            r#"<title>About us</title>
               <a href="{base}/">home</a>
               <a href="{base}/team">team</a>
               <a href="tel:+15551234567">call</a>"#
        ),
    )
    .await;
    mount_html(&server, "/team", "<title>Team</title>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<title>Not here</title>"))
        .mount(&server)
        .await;

    let settings = CrawlOptions::new(base.clone(), 2)
        .with_workers(2)
        .with_fetch_timeout_ms(5_000)
        .validate()
        .unwrap();
    let report = Crawler::new(settings, Arc::new(test_fetcher())).crawl().await;
    let tree = &report.tree;

    assert!(report.is_complete());
    assert_eq!(tree.len(), 4);

    let root = tree.get(tree.root()).unwrap();
    assert_eq!(root.title, "Home");
    assert_eq!(root.status, Some(200));
    assert!(root.emails.contains("owner@site.test"));

    let about = tree.get(&format!("{}/about", base)).unwrap();
    assert_eq!(about.title, "About us");
    assert_eq!(about.depth, 1);
    assert!(about.phones.contains("+15551234567"));

    let missing = tree.get(&format!("{}/missing", base)).unwrap();
    assert_eq!(missing.status, Some(404));
    assert_eq!(missing.state, PageState::HttpError);

    let team = tree.get(&format!("{}/team", base)).unwrap();
    assert_eq!(team.depth, 2);
    assert_eq!(team.parent.as_deref(), Some(about.url.as_str()));
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(&server, "/", format!(r#"<a href="{base}/slow">slow</a>"#)).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("late".to_string()).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let settings = CrawlOptions::new(base.clone(), 1)
        .with_fetch_timeout_ms(300)
        .validate()
        .unwrap();
    let report = Crawler::new(settings, Arc::new(test_fetcher())).crawl().await;

    let slow = report.tree.get(&format!("{}/slow", base)).unwrap();
    assert_eq!(slow.status, None);
    assert_eq!(slow.state, PageState::Timeout);
    assert!(report.is_complete());
}

#[tokio::test]
async fn test_fetcher_follows_redirects() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", base).as_str()),
        )
        .mount(&server)
        .await;
    mount_html(&server, "/new", "<title>New</title>".to_string()).await;

    let url = format!("{}/old", base);
    let page = test_fetcher()
        .fetch(&url, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(page.status, 200);
    assert_eq!(page.final_url, format!("{}/new", base));
    assert!(page.body.contains("New"));
}

#[tokio::test]
async fn test_fetcher_sends_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestCrawler/1.0"))
        .respond_with(html("<title>ok</title>".to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/", server.uri());
    let page = test_fetcher().fetch(&url, Duration::from_secs(5)).await.unwrap();
    assert_eq!(page.status, 200);
}

#[tokio::test]
async fn test_fetch_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(String::new()).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let url = format!("{}/", server.uri());
    let result = test_fetcher().fetch(&url, Duration::from_millis(200)).await;
    assert!(matches!(result, Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_tor_check_reports_exit_address() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        r#"<html><body><div class="content">
              <h1 class="on">Congratulations. This browser is configured to use Tor.</h1>
              <p>Your IP address appears to be: <strong>185.220.101.4</strong></p>
           </div></body></html>"#
            .to_string(),
    )
    .await;

    let fetcher = test_fetcher();
    let check = check_tor(
        fetcher.client(),
        &format!("{}/", server.uri()),
        Duration::from_secs(5),
    )
    .await
    .unwrap();

    assert!(check.uses_tor());
    assert_eq!(
        check.header,
        "Congratulations. This browser is configured to use Tor."
    );
    assert_eq!(check.ip_address.as_deref(), Some("185.220.101.4"));
}

#[tokio::test]
async fn test_tor_check_rejects_unexpected_page() {
    let server = MockServer::start().await;
    mount_html(&server, "/", "<p>maintenance</p>".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = test_fetcher();
    let timeout = Duration::from_secs(5);

    let result = check_tor(fetcher.client(), &format!("{}/", server.uri()), timeout).await;
    assert_eq!(result.unwrap_err(), ReconError::MissingElement("div.content"));

    let result = check_tor(fetcher.client(), &format!("{}/down", server.uri()), timeout).await;
    assert!(matches!(result, Err(ReconError::Status { status: 503, .. })));
}

#[tokio::test]
async fn test_site_recon_against_mock_site() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_html(
        &server,
        "/shop/index.html",
        r#"<html><head>
              <title>Shop</title>
              <meta name="description" content="Hidden shop">
           </head><body>
              <p>Pay to 1BoatSLRHtKNngkdXEeobR76b53LETtpyT</p>
              <p>Contact sales@shop.test</p>
              <script>var cdn = "assets.s3.amazonaws.com";</script>
           </body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow: /admin\nDisallow: /*.bak\nAllow: /shop\n"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/.git/config"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[core]\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/.htaccess"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    // .svn/entries is not mounted: wiremock answers 404

    let fetcher = test_fetcher();
    let url = Url::parse(&format!("{}/shop/index.html?x=1", base)).unwrap();
    let report = investigate(fetcher.client(), &url, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(report.status, 200);
    assert_eq!(report.title.as_deref(), Some("Shop"));
    assert_eq!(report.description(), Some("Hidden shop"));

    let robots = report.robots.as_ref().expect("robots.txt should be found");
    assert_eq!(robots.url, format!("{}/robots.txt", base));
    assert_eq!(
        robots.entries.iter().cloned().collect::<Vec<_>>(),
        vec![format!("{}/admin", base), format!("{}/shop", base)]
    );

    let outcome = |p: &str| {
        report
            .probes
            .iter()
            .find(|probe| probe.path == p)
            .map(|probe| probe.outcome.clone())
    };
    assert_eq!(outcome(".git/config"), Some(ProbeOutcome::Exposed { status: 200 }));
    assert_eq!(outcome(".htaccess"), Some(ProbeOutcome::Forbidden));
    assert_eq!(outcome(".svn/entries"), Some(ProbeOutcome::Absent { status: 404 }));
    assert_eq!(report.exposed().count(), 1);

    assert!(report.intel.contains("sales@shop.test"));
    assert!(report.intel.contains("assets.s3.amazonaws.com"));
    assert!(report
        .bitcoin_addresses
        .contains("1BoatSLRHtKNngkdXEeobR76b53LETtpyT"));
}

#[tokio::test]
async fn test_site_recon_fails_only_on_unreachable_page() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();

    let result = investigate(test_fetcher().client(), &url, Duration::from_secs(5)).await;
    assert!(matches!(result, Err(ReconError::Request { .. })));
}
