//! Access decision table.
//!
//! Rules, evaluated in order, first match wins:
//!
//! | route       | session | path is login | decision            |
//! |-------------|---------|---------------|---------------------|
//! | excluded    | (not decoded) | -       | Forward             |
//! | Protected   | none    | -             | RedirectTo(login)   |
//! | Public      | valid   | no            | RedirectTo(home)    |
//! | any         | valid   | yes           | RedirectTo(home)    |
//! | otherwise   |         |               | Forward             |
//!
//! The login rule overlaps the Public rule whenever the login path is listed
//! as public. It stays so that an authenticated caller can never reach the
//! login page even when the route table forgets to list it.

use chrono::{DateTime, Utc};

use crate::config::{validate_routes, validate_config, ConfigError, GatewayConfig, RoutesConfig, SecretKey};
use crate::routing::path::{canonical, normalize};
use crate::routing::{RouteClass, RouteMatch, RouteTable};
use crate::session::{DecodeFailure, Session, SessionCodec};

/// What the host should do with one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccessDecision {
    /// Continue normal request handling.
    Forward,
    /// Answer with a redirect to the given location.
    RedirectTo(String),
}

impl AccessDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::Forward => "forward",
            AccessDecision::RedirectTo(_) => "redirect",
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            AccessDecision::Forward => None,
            AccessDecision::RedirectTo(location) => Some(location),
        }
    }
}

/// A decision plus what it was derived from, for logging and auditing.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub decision: AccessDecision,
    pub route: RouteMatch,
    /// `None` when the path was excluded and no decode was attempted.
    pub session: Option<Result<Session, DecodeFailure>>,
}

impl Evaluation {
    pub fn failure(&self) -> Option<DecodeFailure> {
        match &self.session {
            Some(Err(failure)) => Some(*failure),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref().and_then(|s| s.as_ref().ok())
    }

    pub fn into_session(self) -> Option<Session> {
        self.session.and_then(Result::ok)
    }
}

/// Classifies paths, validates sessions and decides.
///
/// Immutable and `Send + Sync`; share one instance behind an `Arc`.
#[derive(Debug)]
pub struct AccessGateway {
    routes: RouteTable,
    codec: SessionCodec,
    login_path: String,
    home_path: String,
}

impl AccessGateway {
    /// Build a gateway, refusing route tables that break the disjointness
    /// or redirect-loop invariants.
    pub fn new(routes: &RoutesConfig, codec: SessionCodec) -> Result<Self, ConfigError> {
        validate_routes(routes).map_err(ConfigError::Validation)?;

        Ok(Self {
            routes: RouteTable::from_config(routes),
            codec,
            login_path: canonical(&routes.login_path),
            home_path: routes.home_path.clone(),
        })
    }

    /// Validate the whole configuration and build a gateway keyed with `key`.
    pub fn from_config(config: &GatewayConfig, key: &SecretKey) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;
        Self::new(&config.routes, SessionCodec::new(key))
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    pub fn codec(&self) -> &SessionCodec {
        &self.codec
    }

    /// The decision alone.
    pub fn decide(&self, path: &str, token: Option<&str>, now: DateTime<Utc>) -> AccessDecision {
        self.evaluate(path, token, now).decision
    }

    /// Evaluate one request described as (path, optional token, now).
    pub fn evaluate(&self, path: &str, token: Option<&str>, now: DateTime<Utc>) -> Evaluation {
        let path = normalize(path);

        let class = match self.routes.lookup(&path) {
            RouteMatch::Excluded => {
                return Evaluation {
                    decision: AccessDecision::Forward,
                    route: RouteMatch::Excluded,
                    session: None,
                };
            }
            RouteMatch::Classified(class) => class,
        };

        let session = self.codec.decode(token, now);
        let authenticated = session.is_ok();
        let is_login = canonical(&path) == self.login_path;

        let decision = match class {
            RouteClass::Protected if !authenticated => self.redirect_to_login(),
            RouteClass::Public if authenticated && !is_login => self.redirect_home(),
            _ if is_login && authenticated => self.redirect_home(),
            _ => AccessDecision::Forward,
        };

        tracing::debug!(
            path = %path,
            route = class.as_str(),
            authenticated,
            decision = decision.as_str(),
            "access evaluated"
        );

        Evaluation {
            decision,
            route: RouteMatch::Classified(class),
            session: Some(session),
        }
    }

    fn redirect_to_login(&self) -> AccessDecision {
        AccessDecision::RedirectTo(self.login_path.clone())
    }

    fn redirect_home(&self) -> AccessDecision {
        AccessDecision::RedirectTo(self.home_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;
    use chrono::Duration;

    const KEY: &str = "decision-table-test-key-0123456789abcdef";

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000, 0).unwrap()
    }

    fn codec() -> SessionCodec {
        SessionCodec::new(&SecretKey::new(KEY))
    }

    fn gateway_with(routes: RoutesConfig) -> AccessGateway {
        AccessGateway::new(&routes, codec()).unwrap()
    }

    fn gateway() -> AccessGateway {
        gateway_with(RoutesConfig::default())
    }

    fn token(role: Role, expires_in: Duration) -> String {
        codec().encode(&Session {
            subject: "staff-1".into(),
            role,
            issued_at: Some(now() - Duration::minutes(5)),
            expires_at: now() + expires_in,
        })
        .unwrap()
    }

    fn valid() -> String {
        token(Role::Admin, Duration::hours(1))
    }

    fn expired() -> String {
        token(Role::Sales, Duration::seconds(-1))
    }

    fn login() -> AccessDecision {
        AccessDecision::RedirectTo("/login".into())
    }

    fn home() -> AccessDecision {
        AccessDecision::RedirectTo("/".into())
    }

    #[test]
    fn test_scenarios() {
        let gw = gateway();

        assert_eq!(gw.decide("/dashboard", None, now()), login());
        assert_eq!(gw.decide("/login", Some(&valid()), now()), home());
        assert_eq!(gw.decide("/login", None, now()), AccessDecision::Forward);
        assert_eq!(gw.decide("/quotes/42", Some(&expired()), now()), login());
        for token in [None, Some(valid()), Some(expired()), Some("junk".to_string())] {
            assert_eq!(
                gw.decide("/api/anything", token.as_deref(), now()),
                AccessDecision::Forward
            );
        }
    }

    #[test]
    fn test_protected_without_valid_session() {
        let gw = gateway();
        let tampered = format!("{}x", valid());

        for path in ["/dashboard", "/quotes", "/quotes/42/edit", "/airports", "/audit-logs"] {
            for token in [None, Some(expired()), Some(tampered.clone()), Some(String::new())] {
                assert_eq!(gw.decide(path, token.as_deref(), now()), login(), "path {path}");
            }
        }
    }

    #[test]
    fn test_protected_with_valid_session_forwards() {
        let gw = gateway();
        let sales = token(Role::Sales, Duration::minutes(1));

        assert_eq!(gw.decide("/quotes/42", Some(&sales), now()), AccessDecision::Forward);
        assert_eq!(gw.decide("/dashboard", Some(&valid()), now()), AccessDecision::Forward);
    }

    #[test]
    fn test_public_with_valid_session_goes_home() {
        let mut routes = RoutesConfig::default();
        routes.public.push("/signup".into());
        let gw = gateway_with(routes);

        assert_eq!(gw.decide("/signup", Some(&valid()), now()), home());
        assert_eq!(gw.decide("/signup/step-2", Some(&valid()), now()), home());
        assert_eq!(gw.decide("/signup", None, now()), AccessDecision::Forward);
        assert_eq!(gw.decide("/signup", Some(&expired()), now()), AccessDecision::Forward);
    }

    #[test]
    fn test_login_redirects_even_when_not_public() {
        let mut routes = RoutesConfig::default();
        routes.public.clear();
        let gw = gateway_with(routes);

        let eval = gw.evaluate("/login", Some(&valid()), now());
        assert_eq!(eval.route, RouteMatch::Classified(RouteClass::Unclassified));
        assert_eq!(eval.decision, home());

        assert_eq!(gw.decide("/login/", Some(&valid()), now()), home());
        assert_eq!(gw.decide("/login", None, now()), AccessDecision::Forward);
    }

    #[test]
    fn test_unclassified_forwards_regardless_of_session() {
        let gw = gateway();

        for token in [None, Some(valid()), Some(expired())] {
            assert_eq!(gw.decide("/", token.as_deref(), now()), AccessDecision::Forward);
            assert_eq!(gw.decide("/about", token.as_deref(), now()), AccessDecision::Forward);
            assert_eq!(gw.decide("/quotesheet", token.as_deref(), now()), AccessDecision::Forward);
        }
    }

    #[test]
    fn test_expiry_equal_to_now_is_expired() {
        let gw = gateway();
        let at_now = token(Role::Admin, Duration::zero());

        let eval = gw.evaluate("/dashboard", Some(&at_now), now());
        assert_eq!(eval.decision, login());
        assert_eq!(eval.failure(), Some(DecodeFailure::Expired));
    }

    #[test]
    fn test_failure_reasons_do_not_change_decision() {
        let gw = gateway();
        let wrong_role = codec()
            .encode(&Session {
                subject: "x".into(),
                role: Role::Unrecognized,
                issued_at: None,
                expires_at: now() + Duration::hours(1),
            })
            .unwrap();

        let outcomes: Vec<_> = [None, Some("garbage".to_string()), Some(wrong_role), Some(expired())]
            .iter()
            .map(|t| gw.evaluate("/quotes", t.as_deref(), now()))
            .collect();

        let failures: Vec<_> = outcomes.iter().map(|e| e.failure()).collect();
        assert_eq!(
            failures,
            vec![
                Some(DecodeFailure::NoCredential),
                Some(DecodeFailure::Invalid),
                Some(DecodeFailure::Malformed),
                Some(DecodeFailure::Expired),
            ]
        );
        assert!(outcomes.iter().all(|e| e.decision == login()));
    }

    #[test]
    fn test_excluded_paths_skip_decoding() {
        let gw = gateway();

        let eval = gw.evaluate("/_next/static/chunk.js", Some(&valid()), now());
        assert_eq!(eval.route, RouteMatch::Excluded);
        assert!(eval.session.is_none());
        assert_eq!(eval.decision, AccessDecision::Forward);
    }

    #[test]
    fn test_asset_extensions_do_not_unlock_protected_routes() {
        let gw = gateway();

        for path in [
            "/quotes/42.txt",
            "/dashboard/report.js",
            "/audit-logs/export.css",
            "/quotes/42%2Etxt",
            "/users/avatar.PNG",
        ] {
            let eval = gw.evaluate(path, None, now());
            assert_eq!(eval.route, RouteMatch::Classified(RouteClass::Protected), "path {path}");
            assert_eq!(eval.decision, login(), "path {path}");
        }

        assert_eq!(gw.decide("/quotes/42.txt", Some(&valid()), now()), AccessDecision::Forward);
        assert_eq!(gw.evaluate("/logo.png", None, now()).route, RouteMatch::Excluded);
    }

    #[test]
    fn test_path_tricks_are_normalized() {
        let gw = gateway();

        for path in ["//dashboard", "/./quotes/1", "/login/../quotes", "/%64ashboard"] {
            assert_eq!(gw.decide(path, None, now()), login(), "path {path}");
        }
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let gw = gateway();
        let t = valid();

        for path in ["/login", "/dashboard", "/", "/api/x"] {
            assert_eq!(
                gw.decide(path, Some(&t), now()),
                gw.decide(path, Some(&t), now())
            );
        }
    }

    #[test]
    fn test_overlapping_routes_fail_fast() {
        let mut routes = RoutesConfig::default();
        routes.public.push("/quotes/public".into());

        let err = AccessGateway::new(&routes, codec()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_session_is_exposed_on_success() {
        let gw = gateway();
        let eval = gw.evaluate("/dashboard", Some(&valid()), now());

        assert_eq!(eval.session().map(|s| s.role), Some(Role::Admin));
        assert_eq!(eval.into_session().map(|s| s.subject), Some("staff-1".to_string()));
    }
}
