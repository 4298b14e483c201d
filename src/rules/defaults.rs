//! Built-in rule table for the gateway configuration schema
//!
//! Order matters: more specific paths must come before their prefixes
//! (`krakend/proxy/plugin/response` before `krakend/proxy`).

pub(super) const BUILTIN_RULES: &[(&str, &str)] = &[
    // Core transports and plugins
    ("github_com/devopsfaith/krakend/transport/http/server/handler", "plugin/http-server"),
    ("github.com/devopsfaith/krakend/transport/http/client/executor", "plugin/http-client"),
    ("github.com/devopsfaith/krakend/proxy/plugin/response", "plugin/response-modifier"),
    ("github.com/devopsfaith/krakend/proxy/plugin/request", "plugin/request-modifier"),
    ("github.com/devopsfaith/krakend/proxy", "proxy"), // e.g. shadow proxy
    ("github_com/luraproject/lura/router/gin", "router"),
    // QoS
    ("github.com/devopsfaith/krakend-ratelimit/juju/router", "qos/ratelimit/router"),
    ("github.com/devopsfaith/krakend-ratelimit/juju/proxy", "qos/ratelimit/proxy"),
    ("github.com/devopsfaith/krakend-httpcache", "qos/http-cache"),
    ("github.com/devopsfaith/krakend-circuitbreaker/gobreaker", "qos/circuit-breaker"),
    // Auth
    ("github.com/devopsfaith/krakend-oauth2-clientcredentials", "auth/client-credentials"),
    ("github.com/devopsfaith/krakend-jose/validator", "auth/validator"),
    ("github.com/devopsfaith/krakend-jose/signer", "auth/signer"),
    ("github_com/devopsfaith/bloomfilter", "auth/revoker"),
    // Security
    ("github_com/devopsfaith/krakend-botdetector", "security/bot-detector"),
    ("github_com/devopsfaith/krakend-httpsecure", "security/http"),
    ("github_com/devopsfaith/krakend-cors", "security/cors"),
    // Validation
    ("github.com/devopsfaith/krakend-cel", "validation/cel"),
    ("github.com/devopsfaith/krakend-jsonschema", "validation/json-schema"),
    // Backends
    ("github.com/devopsfaith/krakend-amqp/consume", "backend/amqp/consumer"),
    ("github.com/devopsfaith/krakend-amqp/produce", "backend/amqp/producer"),
    ("github.com/devopsfaith/krakend-lambda", "backend/lambda"),
    ("github.com/devopsfaith/krakend-pubsub/publisher", "backend/pubsub/publisher"),
    // The historical table shipped "backend/pubsub/susbcriber"; the gateway
    // schema spells it "subscriber", so the typo is deliberately not kept.
    ("github.com/devopsfaith/krakend-pubsub/subscriber", "backend/pubsub/subscriber"),
    ("github.com/devopsfaith/krakend/transport/http/client/graphql", "backend/graphql"),
    ("github.com/devopsfaith/krakend/http", "backend/http"), // e.g. detailed_errors
    // Telemetry
    ("github_com/devopsfaith/krakend-gelf", "telemetry/gelf"),
    ("github_com/devopsfaith/krakend-gologging", "telemetry/logging"),
    ("github_com/devopsfaith/krakend-logstash", "telemetry/logstash"),
    ("github_com/devopsfaith/krakend-metrics", "telemetry/metrics"),
    ("github_com/letgoapp/krakend-influx", "telemetry/influx"),
    ("github_com/devopsfaith/krakend-influx", "telemetry/influx"),
    ("github_com/devopsfaith/krakend-opencensus", "telemetry/opencensus"),
    // Modifiers
    ("github.com/devopsfaith/krakend-lua/router", "modifier/lua-endpoint"),
    ("github.com/devopsfaith/krakend-lua/proxy", "modifier/lua-proxy"),
    ("github.com/devopsfaith/krakend-lua/proxy/backend", "modifier/lua-backend"),
    ("github.com/devopsfaith/krakend-martian", "modifier/martian"),
    // Enterprise
    ("github_com/devopsfaith/krakend-swagger", "generator/openapi"),
    ("github_com/devopsfaith/krakend-apikeys", "auth/api-keys"),
    ("github_com/devopsfaith/krakend-instana", "telemetry/instana"),
    ("github.com/devopsfaith/krakend-websocket", "websocket"),
    // Deprecations
    ("whitelist", "allow"),
    ("blacklist", "deny"),
    (
        "github.com/devopsfaith/krakend-etcd",
        "---- THE ETCD COMPONENT IS NO LONGER SUPPORTED ----",
    ),
    (
        "github.com/devopsfaith/krakend-consul",
        "---- THE BLOOMFILTER-CONSUL INTEGRATION IS NO LONGER SUPPORTED ----",
    ),
    // JOSE
    ("propagate-claims", "propagate_claims"),
    ("jwk-url", "jwk_url"),
    ("keys-to-sign", "keys_to_sign"),
    // Circuit breaker
    ("maxErrors", "max_errors"),
    ("logStatusChange", "log_status_change"),
    // Bot detector
    ("Denylist", "deny"),
    ("Allowlist", "allow"),
    ("Patterns", "patterns"),
    ("CacheSize", "cache_size"),
];
