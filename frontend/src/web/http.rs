//! 浏览器 HTTP 客户端
//!
//! 基于 `gloo-net` 的 fetch 封装，实现核心库的 `HttpClient`。

use bidash::request::{HttpBody, HttpMethod};
use bidash::{DashError, DashResult, HttpClient, HttpRequest, HttpResponse, MultipartFile};
use gloo_net::http::{Request, RequestBuilder};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

fn network_error(op: &str, e: impl std::fmt::Display) -> DashError {
    DashError::network(e.to_string()).in_op(op.to_string())
}

/// 把文件字节包装成带 MIME 的 Blob 放入 FormData
fn build_form_data(file: &MultipartFile) -> Result<FormData, JsValue> {
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);

    let options = BlobPropertyBag::new();
    options.set_type(&file.mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename(&file.field, &blob, &file.file_name)?;
    Ok(form)
}

fn builder_for(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

/// fetch 客户端
#[derive(Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> DashResult<HttpResponse> {
        let mut builder = builder_for(req.method, &req.url);
        for (k, v) in &req.headers {
            builder = builder.header(k, v);
        }

        let request = match &req.body {
            None => builder.build(),
            Some(HttpBody::Json(body)) => builder.body(body.as_str()),
            Some(HttpBody::Multipart(file)) => {
                let form = build_form_data(file).map_err(|e| {
                    DashError::validation("could not prepare upload")
                        .in_op_with("http.form_data", format!("{:?}", e))
                })?;
                builder.body(form)
            }
        }
        .map_err(|e| network_error("http.build", e))?;

        let response = request
            .send()
            .await
            .map_err(|e| network_error("http.send", e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| network_error("http.read_body", e))?;

        Ok(HttpResponse { status, body })
    }
}
