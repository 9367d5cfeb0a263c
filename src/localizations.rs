use std::collections::HashMap;

const DEFAULT_LANG: &str = "pt-BR";

// Simple in-memory translations
#[derive(Default)]
pub struct Translations {
    strings: HashMap<&'static str, &'static str>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &'static str, value: &'static str) {
        self.strings.insert(key, value);
    }

    pub fn lookup(&self, key: &str) -> Option<&'static str> {
        self.strings.get(key).copied()
    }
}

fn portuguese() -> Translations {
    let mut pt = Translations::new();
    pt.insert("app-title", "📥 YouTube Downloader");
    pt.insert("url-label", "🔗 Insira a URL do vídeo:");
    pt.insert("url-placeholder", "https://www.youtube.com/watch?v=...");
    pt.insert("quality-label", "🎮 Qualidade desejada:");
    pt.insert("quality-high", "Alta (1080p/720p)");
    pt.insert("quality-medium", "Média (480p)");
    pt.insert("quality-low", "Baixa (360p)");
    pt.insert("quality-audio", "Somente Áudio");
    pt.insert("audio-only", "🎵 Baixar apenas o áudio (MP3)");
    pt.insert("download-button", "🛂 Baixar");
    pt.insert("enter-url", "Informe a URL do vídeo.");
    pt.insert("status-ready", "Pronto");
    pt.insert("status-starting", "Iniciando download...");
    pt.insert("progress-line", "{percent} baixado | {speed} | ETA: {eta}");
    pt.insert("status-finalizing", "Finalizando...");
    pt.insert("status-complete", "Download concluído");
    pt.insert("internal-error", "Erro interno: {message}");
    pt.insert("processing-error", "❌ Erro no processamento: {message}");
    pt.insert("save-result", "📀 Clique aqui para baixar o arquivo");
    pt.insert("sidebar-title", "📂 Arquivos disponíveis para download");
    pt.insert("filter-label", "Filtrar por:");
    pt.insert("filter-all", "Todos");
    pt.insert("filter-audio", "Áudio");
    pt.insert("filter-video", "Vídeo");
    pt.insert("save-file", "🔍 Baixar {name} ({size} MB)");
    pt.insert("no-files", "Nenhum arquivo encontrado com esse filtro.");
    pt.insert("confirm-delete", "⚠️ Confirmar exclusão de todos os arquivos da pasta temp");
    pt.insert("delete-button", "❌ Limpar arquivos agora");
    pt.insert("saved-to", "Salvo em: {path}");
    pt.insert("output-missing", "Arquivo baixado não encontrado: {path}");
    pt.insert("vlc-title", "🔖 Instalar VLC Player");
    pt
}

fn english() -> Translations {
    let mut en = Translations::new();
    en.insert("app-title", "📥 YouTube Downloader");
    en.insert("url-label", "🔗 Video URL:");
    en.insert("url-placeholder", "https://www.youtube.com/watch?v=...");
    en.insert("quality-label", "🎮 Quality:");
    en.insert("quality-high", "High (1080p/720p)");
    en.insert("quality-medium", "Medium (480p)");
    en.insert("quality-low", "Low (360p)");
    en.insert("quality-audio", "Audio only");
    en.insert("audio-only", "🎵 Download audio only (MP3)");
    en.insert("download-button", "🛂 Download");
    en.insert("enter-url", "Please enter a video URL.");
    en.insert("status-ready", "Ready");
    en.insert("status-starting", "Starting download...");
    en.insert("progress-line", "{percent} downloaded | {speed} | ETA: {eta}");
    en.insert("status-finalizing", "Finalizing...");
    en.insert("status-complete", "Download complete");
    en.insert("internal-error", "Internal error: {message}");
    en.insert("processing-error", "❌ Processing failed: {message}");
    en.insert("save-result", "📀 Click here to save the file");
    en.insert("sidebar-title", "📂 Files available for download");
    en.insert("filter-label", "Filter by:");
    en.insert("filter-all", "All");
    en.insert("filter-audio", "Audio");
    en.insert("filter-video", "Video");
    en.insert("save-file", "🔍 Save {name} ({size} MB)");
    en.insert("no-files", "No files match this filter.");
    en.insert("confirm-delete", "⚠️ Confirm deleting every file in the temp folder");
    en.insert("delete-button", "❌ Clear files now");
    en.insert("saved-to", "Saved to: {path}");
    en.insert("output-missing", "Downloaded file not found: {path}");
    en.insert("vlc-title", "🔖 Install VLC Player");
    en
}

fn spanish() -> Translations {
    let mut es = Translations::new();
    es.insert("app-title", "📥 Descargador de YouTube");
    es.insert("url-label", "🔗 URL del video:");
    es.insert("quality-label", "🎮 Calidad deseada:");
    es.insert("quality-high", "Alta (1080p/720p)");
    es.insert("quality-medium", "Media (480p)");
    es.insert("quality-low", "Baja (360p)");
    es.insert("quality-audio", "Solo audio");
    es.insert("audio-only", "🎵 Descargar solo el audio (MP3)");
    es.insert("download-button", "🛂 Descargar");
    es.insert("enter-url", "Ingrese la URL del video.");
    es.insert("status-ready", "Listo");
    es.insert("status-starting", "Iniciando descarga...");
    es.insert("progress-line", "{percent} descargado | {speed} | ETA: {eta}");
    es.insert("status-finalizing", "Finalizando...");
    es.insert("status-complete", "Descarga completada");
    es.insert("internal-error", "Error interno: {message}");
    es.insert("processing-error", "❌ Error en el procesamiento: {message}");
    es.insert("save-result", "📀 Haga clic aquí para guardar el archivo");
    es.insert("sidebar-title", "📂 Archivos disponibles para descargar");
    es.insert("filter-label", "Filtrar por:");
    es.insert("filter-all", "Todos");
    es.insert("filter-audio", "Audio");
    es.insert("filter-video", "Video");
    es.insert("save-file", "🔍 Guardar {name} ({size} MB)");
    es.insert("no-files", "No se encontraron archivos con ese filtro.");
    es.insert("confirm-delete", "⚠️ Confirmar la eliminación de todos los archivos de la carpeta temporal");
    es.insert("delete-button", "❌ Limpiar archivos ahora");
    es.insert("saved-to", "Guardado en: {path}");
    es.insert("output-missing", "Archivo descargado no encontrado: {path}");
    es.insert("vlc-title", "🔖 Instalar VLC Player");
    es
}

pub struct Localizations {
    translations: HashMap<&'static str, Translations>,
    current_lang: String,
}

impl Default for Localizations {
    fn default() -> Self {
        Self::new()
    }
}

impl Localizations {
    /// Picks the language from `LANG`, defaulting to Portuguese.
    pub fn new() -> Self {
        let lang = std::env::var("LANG").unwrap_or_default();
        let lang = lang.split(['.', '@']).next().unwrap_or_default().replace('_', "-");
        Self::for_language(&lang)
    }

    pub fn for_language(lang: &str) -> Self {
        let mut translations = HashMap::new();
        translations.insert("pt-BR", portuguese());
        translations.insert("en-US", english());
        translations.insert("es-ES", spanish());

        let mut localizer = Self {
            translations,
            current_lang: DEFAULT_LANG.to_string(),
        };
        localizer.select(lang);
        localizer
    }

    pub fn current_language(&self) -> &str {
        &self.current_lang
    }

    pub fn lookup_single_language(&self, key: &str) -> Option<String> {
        self.translations
            .get(self.current_lang.as_str())
            .and_then(|t| t.lookup(key))
            .or_else(|| {
                // Fall back to the default language for missing keys
                self.translations.get(DEFAULT_LANG).and_then(|t| t.lookup(key))
            })
            .map(|s| s.to_string())
    }

    /// Looks up `key` and fills `{name}` placeholders.
    pub fn lookup_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        let template = self
            .lookup_single_language(key)
            .unwrap_or_else(|| key.to_string());
        args.iter().fold(template, |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }

    pub fn select(&mut self, lang: &str) {
        // Try exact match first
        if self.translations.contains_key(lang) {
            self.current_lang = lang.to_string();
            return;
        }

        // Try language code only
        let lang_part = lang.split('-').next().unwrap_or(lang).to_lowercase();
        if !lang_part.is_empty() {
            for &key in self.translations.keys() {
                if key.starts_with(lang_part.as_str()) {
                    self.current_lang = key.to_string();
                    return;
                }
            }
        }

        self.current_lang = DEFAULT_LANG.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_by_language_code() {
        assert_eq!(Localizations::for_language("en-GB").current_language(), "en-US");
        assert_eq!(Localizations::for_language("es").current_language(), "es-ES");
        assert_eq!(Localizations::for_language("pt-PT").current_language(), "pt-BR");
        assert_eq!(Localizations::for_language("").current_language(), "pt-BR");
        assert_eq!(Localizations::for_language("de-DE").current_language(), "pt-BR");
    }

    #[test]
    fn missing_keys_fall_back_to_portuguese() {
        let es = Localizations::for_language("es-ES");
        assert_eq!(
            es.lookup_single_language("url-placeholder").as_deref(),
            Some("https://www.youtube.com/watch?v=...")
        );
        assert_eq!(es.lookup_single_language("no-such-key"), None);
    }

    #[test]
    fn fills_placeholders() {
        let pt = Localizations::for_language("pt-BR");
        assert_eq!(
            pt.lookup_with("save-file", &[("name", "a.mp3"), ("size", "1.50")]),
            "🔍 Baixar a.mp3 (1.50 MB)"
        );
        assert_eq!(pt.lookup_with("unknown", &[]), "unknown");
    }
}
