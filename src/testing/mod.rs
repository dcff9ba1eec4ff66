//! Shared fixtures for unit tests.

use serde_json::json;

use crate::config::AppConfig;

pub fn test_config_value() -> serde_json::Value {
    json!({
        "ConnectionStrings": {
            "DemoConnection": "Server=localdb;Database=friends;"
        },
        "DbSetActiveIdx": 0,
        "DbSets": [
            {
                "DbLocation": "Local",
                "DbServer": "Demo",
                "DbLogins": [
                    { "DbUserLogin": "gstusr", "DbConnection": "DemoConnection" },
                    { "DbUserLogin": "usr", "DbConnection": "DemoConnection" },
                    { "DbUserLogin": "supusr", "DbConnection": "DemoConnection" }
                ]
            }
        ],
        "PasswordSaltDetails": { "Salt": "test-salt", "Iterations": 100 },
        "JwtConfig": {
            "LifeTimeMinutes": 60,
            "ValidateIssuerSigningKey": true,
            "IssuerSigningKey": "a-test-signing-key-of-decent-length",
            "ValidateIssuer": true,
            "ValidIssuer": "goodfriends",
            "ValidateAudience": true,
            "ValidAudience": "goodfriends-clients",
            "RequireExpirationTime": true,
            "ValidateLifetime": true
        }
    })
}

pub fn test_app_config() -> AppConfig {
    AppConfig::from_value(test_config_value()).expect("test config binds")
}
