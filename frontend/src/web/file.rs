//! 本地文件读取

use bidash::views::upload::SelectedFile;
use bidash::{DashError, DashResult};
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

/// 取出 `<input type="file">` 中选中的第一个文件
pub fn first_file(ev: &web_sys::Event) -> Option<web_sys::File> {
    let input = ev.target()?.dyn_into::<HtmlInputElement>().ok()?;
    input.files()?.get(0)
}

/// 清空 file input，允许再次选择同一个文件
pub fn clear_input(input: &HtmlInputElement) {
    input.set_value("");
}

pub fn reset_input(ev: &web_sys::Event) {
    if let Some(input) = ev
        .target()
        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
    {
        clear_input(&input);
    }
}

pub fn describe(file: &web_sys::File) -> SelectedFile {
    SelectedFile {
        name: file.name(),
        mime: file.type_(),
        size_bytes: file.size() as u64,
    }
}

pub async fn read_bytes(file: &web_sys::File) -> DashResult<Vec<u8>> {
    let file = gloo_file::File::from(file.clone());
    gloo_file::futures::read_as_bytes(&file)
        .await
        .map_err(|e| {
            DashError::validation("Could not read the selected file")
                .in_op_with("file.read", e.to_string())
        })
}
