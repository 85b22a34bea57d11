use std::sync::atomic::{AtomicU8, Ordering};

use desk_configurator_lib::state::Language;

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=English (default)

pub fn lang() -> Language {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Language::Polish,
        _ => Language::English,
    }
}

pub fn set_lang(l: Language) {
    CURRENT_LANG.store(
        match l {
            Language::English => 0,
            Language::Polish => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let pl = lang() == Language::Polish;
    match key {
        // ── Menus ───────────────────────────────────────────
        "menu.file" => if pl { "Plik" } else { "File" },
        "menu.new" => if pl { "Nowa konfiguracja" } else { "New configuration" },
        "menu.open" => if pl { "Otwórz..." } else { "Open..." },
        "menu.open_title" => if pl { "Otwórz konfigurację JSON" } else { "Open configuration JSON" },
        "menu.save" => if pl { "Zapisz..." } else { "Save..." },
        "menu.save_title" => if pl { "Zapisz konfigurację JSON" } else { "Save configuration JSON" },
        "menu.cloud_save" => if pl { "Zapisz w chmurze...  Ctrl+S" } else { "Save to cloud...  Ctrl+S" },
        "menu.cloud_load" => if pl { "Wczytaj z chmury..." } else { "Load from cloud..." },
        "menu.quit" => if pl { "Zakończ" } else { "Quit" },

        "menu.view" => if pl { "Widok" } else { "View" },
        "menu.dimensions" => if pl { "Wymiary  D" } else { "Dimensions  D" },
        "menu.edit_mode" => if pl { "Tryb edycji  E" } else { "Edit mode  E" },
        "menu.configuration_panel" => if pl { "Panel konfiguracji" } else { "Configuration panel" },
        "menu.admin_panel" => if pl { "Panel administratora" } else { "Admin panel" },
        "menu.reset_camera" => if pl { "Resetuj kamerę" } else { "Reset camera" },
        "menu.language" => if pl { "Język" } else { "Language" },

        "menu.settings" => if pl { "Ustawienia" } else { "Settings" },
        "menu.preferences" => if pl { "Preferencje..." } else { "Preferences..." },

        // ── Configuration steps ─────────────────────────────
        "steps.title" => if pl { "Konfigurator biurka" } else { "Desk configurator" },
        "steps.size" => if pl { "1. Rozmiar" } else { "1. Size" },
        "steps.width" => if pl { "Szerokość" } else { "Width" },
        "steps.depth" => if pl { "Głębokość" } else { "Depth" },
        "steps.size_price" => if pl { "Cena rozmiaru" } else { "Size price" },
        "steps.top_color" => if pl { "2. Kolor blatu" } else { "2. Top color" },
        "steps.frame" => if pl { "3. Stelaż" } else { "3. Frame" },
        "steps.frame_color" => if pl { "Kolor stelaża" } else { "Frame color" },
        "steps.accessories" => if pl { "4. Akcesoria" } else { "4. Accessories" },
        "steps.addons" => if pl { "5. Dodatki" } else { "5. Add-ons" },
        "steps.custom" => if pl { "6. Własne modele" } else { "6. Custom models" },
        "steps.custom_top" => if pl { "Własny blat" } else { "Custom top" },
        "steps.custom_frame" => if pl { "Własny stelaż" } else { "Custom frame" },
        "steps.elements" => if pl { "Elementy dekoracyjne" } else { "Decorative elements" },
        "steps.upload_model" => if pl { "Wgraj model (FBX/STL/OBJ)" } else { "Upload model (FBX/STL/OBJ)" },
        "steps.upload_texture" => if pl { "Wgraj teksturę" } else { "Upload texture" },
        "steps.clear_texture" => if pl { "Usuń teksturę" } else { "Clear texture" },
        "steps.add_element" => if pl { "Dodaj element" } else { "Add element" },
        "steps.on_frame" => if pl { "Leży na stelażu" } else { "Rests on frame" },
        "steps.scale" => if pl { "Skala" } else { "Scale" },
        "steps.position" => if pl { "Pozycja" } else { "Position" },
        "steps.remove" => if pl { "Usuń" } else { "Remove" },
        "steps.cloud_required" => if pl { "Wgrywanie wymaga połączenia z chmurą" } else { "Uploads need a cloud connection" },
        "steps.total" => if pl { "Razem" } else { "Total" },

        // ── Admin panel ─────────────────────────────────────
        "admin.title" => if pl { "Modele katalogowe" } else { "Catalog models" },
        "admin.sizes" => if pl { "Blaty" } else { "Tops" },
        "admin.frames" => if pl { "Stelaże" } else { "Frames" },
        "admin.active" => if pl { "model aktywny" } else { "model active" },
        "admin.position_only" => if pl { "tylko pozycja" } else { "position only" },
        "admin.upload_model" => if pl { "Model" } else { "Model" },
        "admin.upload_texture" => if pl { "Tekstura" } else { "Texture" },
        "admin.texture" => if pl { "Tekstura" } else { "Texture" },
        "admin.remove" => if pl { "Usuń" } else { "Remove" },

        // ── Saved configurations ────────────────────────────
        "saved.save_title" => if pl { "Zapisz konfigurację" } else { "Save configuration" },
        "saved.load_title" => if pl { "Zapisane konfiguracje" } else { "Saved configurations" },
        "saved.name" => if pl { "Nazwa" } else { "Name" },
        "saved.save" => if pl { "Zapisz" } else { "Save" },
        "saved.load" => if pl { "Wczytaj" } else { "Load" },
        "saved.refresh" => if pl { "Odśwież" } else { "Refresh" },
        "saved.empty" => if pl { "Brak zapisanych konfiguracji" } else { "No saved configurations" },

        "msg.open_failed" => if pl { "Nie można otworzyć pliku" } else { "Could not open file" },
        "msg.save_failed" => if pl { "Nie można zapisać pliku" } else { "Could not save file" },

        // ── Status bar / viewport ───────────────────────────
        "status.ready" => if pl { "Gotowe" } else { "Ready" },
        "status.selected" => if pl { "Zaznaczono" } else { "Selected" },
        "status.edit_mode" => if pl { "Tryb edycji: kliknij element" } else { "Edit mode: click a part" },
        "status.pending" => if pl { "W toku" } else { "In progress" },
        "status.loading_models" => if pl { "Wczytywanie modeli..." } else { "Loading models..." },
        "status.failed_models" => if pl { "Błędne modele" } else { "Failed models" },
        "status.cloud_on" => if pl { "Chmura: połączono" } else { "Cloud: connected" },
        "status.cloud_off" => if pl { "Chmura: brak" } else { "Cloud: off" },
        "hint.edit_mode" => if pl { "Tryb edycji: przeciągnij strzałki, Esc aby odznaczyć" } else { "Edit mode: drag the arrows, Esc to deselect" },

        // ── Settings ────────────────────────────────────────
        "settings.title" => if pl { "Ustawienia" } else { "Settings" },
        "settings.cloud" => if pl { "Chmura" } else { "Cloud" },
        "settings.cloud_url" => if pl { "Adres usługi" } else { "Service URL" },
        "settings.cloud_key" => if pl { "Klucz API" } else { "API key" },
        "settings.cloud_timeout" => if pl { "Limit czasu" } else { "Timeout" },
        "settings.cloud_limit" => if pl { "Liczba zapisów na liście" } else { "Records listed" },
        "settings.cloud_auto_load" => if pl { "Wczytaj najnowszą konfigurację przy starcie" } else { "Load newest configuration at startup" },
        "settings.cloud_connected" => if pl { "Połączenie skonfigurowane" } else { "Connection configured" },
        "settings.cloud_missing" => if pl { "Podaj adres i klucz, potem Zastosuj" } else { "Enter URL and key, then Apply" },
        "settings.viewport" => if pl { "Podgląd" } else { "Viewport" },
        "settings.bg_color" => if pl { "Kolor tła" } else { "Background color" },
        "settings.sel_color" => if pl { "Kolor zaznaczenia" } else { "Selection color" },
        "settings.grid_visible" => if pl { "Pokaż siatkę" } else { "Show grid" },
        "settings.grid_size" => if pl { "Rozmiar oczka" } else { "Cell size" },
        "settings.grid_range" => if pl { "Liczba linii" } else { "Grid lines" },
        "settings.overlay" => if pl { "Wymiary" } else { "Dimensions" },
        "settings.overlay_default" => if pl { "Pokazuj wymiary przy starcie" } else { "Show dimensions at startup" },
        "settings.overlay_font" => if pl { "Rozmiar etykiet" } else { "Label size" },
        "settings.overlay_color" => if pl { "Kolor linii" } else { "Guide color" },
        "settings.ui" => if pl { "Interfejs" } else { "Interface" },
        "settings.font_size" => if pl { "Rozmiar czcionki" } else { "Font size" },
        "settings.apply" => if pl { "Zastosuj" } else { "Apply" },
        "settings.reset" => if pl { "Przywróć domyślne" } else { "Reset" },
        "settings.close" => if pl { "Zamknij" } else { "Close" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_language() {
        set_lang(Language::Polish);
        assert_eq!(t("menu.file"), "Plik");
        set_lang(Language::English);
        assert_eq!(t("menu.file"), "File");
        assert_eq!(t("no.such.key"), "???");
    }
}
