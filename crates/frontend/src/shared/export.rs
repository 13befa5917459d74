/// Выгрузка данных в файл: CSV из загруженных строк и скачивание через браузер
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// UTF-8 BOM, чтобы Excel правильно определил кодировку
pub const UTF8_BOM: char = '\u{FEFF}';

/// Trait для типов, которые могут быть выгружены в CSV
pub trait CsvExportable {
    /// Возвращает массив заголовков колонок
    fn headers() -> Vec<&'static str>;

    /// Преобразует объект в массив значений строки
    fn to_csv_row(&self) -> Vec<String>;
}

/// Собирает CSV: запятая как разделитель, каждое значение в кавычках, BOM в начале
pub fn build_csv<T: CsvExportable>(data: &[T]) -> String {
    let mut csv_content = String::new();
    csv_content.push(UTF8_BOM);

    let headers: Vec<String> = T::headers().into_iter().map(quote_csv_cell).collect();
    csv_content.push_str(&headers.join(","));
    csv_content.push('\n');

    for item in data {
        let row: Vec<String> = item
            .to_csv_row()
            .iter()
            .map(|cell| quote_csv_cell(cell))
            .collect();
        csv_content.push_str(&row.join(","));
        csv_content.push('\n');
    }

    csv_content
}

/// Оборачивает значение в кавычки, удваивая кавычки внутри
fn quote_csv_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Имя файла выгрузки: `customers_20241231_235959.csv`
pub fn export_filename(prefix: &str, extension: &str) -> String {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.{}", prefix, stamp, extension)
}

/// Скачивает текстовое содержимое (CSV) как файл
pub fn download_text(content: &str, filename: &str, content_type: &str) -> Result<(), String> {
    let array = js_sys::Array::new();
    array.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type(content_type);

    let blob = Blob::new_with_str_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))?;
    download_blob(&blob, filename)
}

/// Скачивает бинарный ответ сервера как файл
pub fn download_bytes(bytes: &[u8], filename: &str, content_type: &str) -> Result<(), String> {
    let array = js_sys::Array::new();
    array.push(&js_sys::Uint8Array::from(bytes));

    let properties = BlobPropertyBag::new();
    properties.set_type(content_type);

    let blob = Blob::new_with_u8_array_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))?;
    download_blob(&blob, filename)
}

/// Инициирует скачивание Blob через браузер
fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;

    // Создаем URL для blob
    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    // Создаем временную ссылку для скачивания
    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    let body = document.body().ok_or("No body element")?;
    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str, &'static str);

    impl CsvExportable for Row {
        fn headers() -> Vec<&'static str> {
            vec!["Name", "Comment"]
        }

        fn to_csv_row(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    #[test]
    fn test_build_csv_quotes_everything() {
        let csv = build_csv(&[Row("Acme, Inc.", "said \"hi\""), Row("Plain", "")]);
        assert!(csv.starts_with(UTF8_BOM));
        let lines: Vec<&str> = csv.trim_start_matches(UTF8_BOM).lines().collect();
        assert_eq!(lines[0], "\"Name\",\"Comment\"");
        assert_eq!(lines[1], "\"Acme, Inc.\",\"said \"\"hi\"\"\"");
        assert_eq!(lines[2], "\"Plain\",\"\"");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_build_csv_empty_has_header() {
        let csv = build_csv::<Row>(&[]);
        assert_eq!(csv, format!("{}\"Name\",\"Comment\"\n", UTF8_BOM));
    }

    #[test]
    fn test_export_filename() {
        let name = export_filename("customers", "csv");
        assert!(name.starts_with("customers_"));
        assert!(name.ends_with(".csv"));
    }
}
