#![deny(missing_docs)]

//! # Requests
//!
//! Statements building, sending and decoding a request inside a generated method.
//! Every statement rebinds `request`, so the builder chain reads top to bottom.

use crate::oas::document::HttpVerb;
use crate::strategies::traits::{ParamBinding, ResponseShape};

const INDENT: &str = "        ";

/// `let url = format!(...)` prefixed with the client's base URL.
pub fn url_statement(template: &str, path_args: &[String]) -> String {
    let mut args = vec!["self.base_url".to_string()];
    args.extend(path_args.iter().map(|arg| format!("param_value(&{})", arg)));
    format!(
        "{}let url = format!({:?}, {});\n",
        INDENT,
        format!("{{}}{}", template),
        args.join(", ")
    )
}

/// Creates the request builder.
pub fn request_statement(verb: HttpVerb) -> String {
    format!(
        "{}let request = self.http.request(reqwest::Method::{}, url);\n",
        INDENT,
        verb.as_str()
    )
}

/// Appends a query parameter; lists become repeated `name=value` pairs.
pub fn query_statement(param: ParamBinding<'_>) -> String {
    let append = |source: &str| {
        if param.repeated {
            format!(
                "{}.iter().fold(request, |request, value| request.query(&[({:?}, value)]))",
                source, param.wire
            )
        } else {
            format!("request.query(&[({:?}, {})])", param.wire, source)
        }
    };
    if param.optional {
        let bound = if param.repeated { "values" } else { "value" };
        optional_statement(param.ident, bound, &append(bound))
    } else {
        let source = if param.repeated {
            param.ident.to_string()
        } else {
            format!("&{}", param.ident)
        };
        format!("{}let request = {};\n", INDENT, append(&source))
    }
}

/// Sets a header; lists are sent comma separated.
pub fn header_statement(param: ParamBinding<'_>) -> String {
    let render = |source: &str| {
        if param.repeated {
            format!(
                "{}.iter().map(|value| param_value(value)).collect::<Vec<_>>().join(\",\")",
                source
            )
        } else {
            format!("param_value({})", source)
        }
    };
    if param.optional {
        let set = format!("request.header({:?}, {})", param.wire, render("value"));
        optional_statement(param.ident, "value", &set)
    } else {
        let source = if param.repeated {
            param.ident.to_string()
        } else {
            format!("&{}", param.ident)
        };
        format!(
            "{}let request = request.header({:?}, {});\n",
            INDENT,
            param.wire,
            render(&source)
        )
    }
}

/// Sets a header to a literal value.
pub fn constant_header_statement(name: &str, value: &str) -> String {
    format!(
        "{}let request = request.header({:?}, {:?});\n",
        INDENT, name, value
    )
}

/// Attaches a JSON body.
pub fn body_statement(ident: &str, optional: bool) -> String {
    if optional {
        optional_statement(ident, "body", "request.json(body)")
    } else {
        format!("{}let request = request.json(&{});\n", INDENT, ident)
    }
}

/// Sends the request and maps a non-success status to `ApiError`.
pub fn send_statement(path: &str) -> String {
    let mut code = String::new();
    code.push_str(&format!("{}let response = request.send().await?;\n", INDENT));
    code.push_str(&format!("{}if !response.status().is_success() {{\n", INDENT));
    code.push_str(&format!(
        "{}    return Err(ApiError::from_response(response, {:?}).await);\n",
        INDENT, path
    ));
    code.push_str(&format!("{}}}\n", INDENT));
    code
}

/// Decodes the response and closes the method.
pub fn response_statement(response: &ResponseShape) -> String {
    let mut code = String::new();
    match response {
        ResponseShape::Empty => {
            code.push_str(&format!("{}Ok(())\n", INDENT));
        }
        ResponseShape::Json(ty) => {
            code.push_str(&format!("{}let bytes = response.bytes().await?;\n", INDENT));
            code.push_str(&format!(
                "{}Ok(serde_json::from_slice::<{}>(&bytes)?)\n",
                INDENT, ty
            ));
        }
        ResponseShape::OptionalJson(ty) => {
            code.push_str(&format!("{}let bytes = response.bytes().await?;\n", INDENT));
            code.push_str(&format!("{}if bytes.is_empty() {{\n", INDENT));
            code.push_str(&format!("{}    return Ok(None);\n", INDENT));
            code.push_str(&format!("{}}}\n", INDENT));
            code.push_str(&format!(
                "{}Ok(serde_json::from_slice::<Option<{}>>(&bytes)?)\n",
                INDENT, ty
            ));
        }
    }
    code.push_str("    }\n");
    code
}

fn optional_statement(ident: &str, bound: &str, some: &str) -> String {
    let mut code = String::new();
    code.push_str(&format!("{}let request = match &{} {{\n", INDENT, ident));
    code.push_str(&format!("{}    Some({}) => {},\n", INDENT, bound, some));
    code.push_str(&format!("{}    None => request,\n", INDENT));
    code.push_str(&format!("{}}};\n", INDENT));
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn binding<'a>(wire: &'a str, ident: &'a str, optional: bool, repeated: bool) -> ParamBinding<'a> {
        ParamBinding {
            wire,
            ident,
            optional,
            repeated,
        }
    }

    #[test]
    fn test_url_statement() {
        assert_eq!(
            url_statement("/users", &[]),
            "        let url = format!(\"{}/users\", self.base_url);\n"
        );
        assert_eq!(
            url_statement("/users/{}/posts/{}", &["user_id".into(), "post_id".into()]),
            "        let url = format!(\"{}/users/{}/posts/{}\", self.base_url, param_value(&user_id), param_value(&post_id));\n"
        );
    }

    #[test]
    fn test_request_statement() {
        assert_eq!(
            request_statement(HttpVerb::Patch),
            "        let request = self.http.request(reqwest::Method::PATCH, url);\n"
        );
    }

    #[test]
    fn test_required_query() {
        assert_eq!(
            query_statement(binding("page-size", "page_size", false, false)),
            "        let request = request.query(&[(\"page-size\", &page_size)]);\n"
        );
    }

    #[test]
    fn test_optional_repeated_query() {
        assert_eq!(
            query_statement(binding("tag", "tag", true, true)),
            concat!(
                "        let request = match &tag {\n",
                "            Some(values) => values.iter().fold(request, |request, value| request.query(&[(\"tag\", value)])),\n",
                "            None => request,\n",
                "        };\n"
            )
        );
    }

    #[test]
    fn test_headers() {
        assert_eq!(
            header_statement(binding("X-Trace", "x_trace", false, false)),
            "        let request = request.header(\"X-Trace\", param_value(&x_trace));\n"
        );
        assert!(header_statement(binding("X-Trace", "x_trace", true, false))
            .contains("Some(value) => request.header(\"X-Trace\", param_value(value)),"));
        assert_eq!(
            constant_header_statement("api-version", "1.0"),
            "        let request = request.header(\"api-version\", \"1.0\");\n"
        );
    }

    #[test]
    fn test_body_statement() {
        assert_eq!(
            body_statement("user", false),
            "        let request = request.json(&user);\n"
        );
        assert!(body_statement("body", true).contains("Some(body) => request.json(body),"));
    }

    #[test]
    fn test_send_statement_keeps_template_for_errors() {
        let code = send_statement("/users/{id}");
        assert!(code.contains("ApiError::from_response(response, \"/users/{id}\").await"));
    }

    #[test]
    fn test_optional_response() {
        let code = response_statement(&ResponseShape::OptionalJson("User".into()));
        assert!(code.contains("return Ok(None);"));
        assert!(code.contains("serde_json::from_slice::<Option<User>>(&bytes)?"));
        assert!(code.ends_with("    }\n"));
    }
}
