//! HTTP span helpers.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = normalise_path_for_span_name(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

fn normalise_path_for_span_name(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_collapsed() {
        let names = request_span_name(
            "POST",
            "/orders/0195d4b2-6f1e-7c3a-9a4b-2f7c1d9e8a10/items/8d1e3c2a-4b5f-4e6d-9a7b-1c2d3e4f5a6b/confirm-date",
        );

        assert_eq!(names.otel_path, "/orders/{uuid}/items/{uuid}/confirm-date");
        assert_eq!(
            names.otel_span_name,
            "POST /orders/{uuid}/items/{uuid}/confirm-date"
        );
    }

    #[test]
    fn root_path_is_kept() {
        assert_eq!(request_span_name("GET", "/").otel_path, "/");
    }
}
