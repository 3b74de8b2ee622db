//! Built-in screen templates.
//!
//! Each screen is the same text format the template loader reads from disk,
//! embedded so the console runs without an asset directory. Files of the same
//! name in the configured template directory take precedence at startup.

/// Main screen: connect, alarm center, quit.
pub const MAIN_MENU: &str = r"<info>
selectorCol={3}
firstLine={5}
selectionIndicator={*}
output={2,12,77,23}
options={connectMenu,alarmMenu,__NULL_LINE__,quit}
</info>
<menu>
================================================================================
                             ROVER COMMAND CONSOLE                              
================================================================================
                                                                                
  Use the arrow keys to choose an option, then press Enter.                     
     Connect Rover                                                              
     Alarm Center                                                               
                                                                                
     Quit                                                                       
                                                                                
--------------------------------------------------------------------------------
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
================================================================================
</menu>";

/// Connection screen: handshake and naming flow.
pub const CONNECT_MENU: &str = r"<info>
selectorCol={3}
firstLine={5}
selectionIndicator={*}
output={2,12,77,23}
options={connect,__NULL_LINE__,returnMain}
</info>
<menu>
================================================================================
                                 CONNECT ROVER                                  
================================================================================
                                                                                
  Use the arrow keys to choose an option, then press Enter.                     
     Connect                                                                    
                                                                                
     Return to Main Menu                                                        
                                                                                
                                                                                
--------------------------------------------------------------------------------
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
================================================================================
</menu>";

/// Alarm screen: configure and arm the threshold alarm.
pub const ALARM_MENU: &str = r"<info>
selectorCol={3}
firstLine={5}
selectionIndicator={*}
output={2,12,77,23}
options={configureAlarm,startAlarm,__NULL_LINE__,returnMain}
</info>
<menu>
================================================================================
                                  ALARM CENTER                                  
================================================================================
                                                                                
  Use the arrow keys to choose an option, then press Enter.                     
     Configure Alarm                                                            
     Arm Alarm                                                                  
                                                                                
     Return to Main Menu                                                        
                                                                                
--------------------------------------------------------------------------------
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
                                                                                
================================================================================
</menu>";

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::template::MenuTemplate;

    fn parses_cleanly(text: &str) -> MenuTemplate {
        let template = MenuTemplate::parse(text);
        assert_eq!(template.layout.console_width, 80);
        assert_eq!(template.layout.console_height, 25);
        assert!(template.layout.output_configured);
        assert_eq!(template.layout.max_chars_per_line, 76);
        assert_eq!(template.layout.output_lines, 12);
        for row in &template.rows {
            assert_eq!(row.chars().count(), 80);
        }
        template
    }

    #[test]
    fn main_menu_geometry() {
        let template = parses_cleanly(MAIN_MENU);
        assert_eq!(
            template.options,
            vec!["connectMenu", "alarmMenu", "__NULL_LINE__", "quit"]
        );
        assert_eq!(template.layout.first_line, 5);
        assert_eq!(template.layout.last_line, 8);
        assert_eq!(template.layout.selector_col, 3);
    }

    #[test]
    fn connect_menu_geometry() {
        let template = parses_cleanly(CONNECT_MENU);
        assert_eq!(
            template.options,
            vec!["connect", "__NULL_LINE__", "returnMain"]
        );
    }

    #[test]
    fn alarm_menu_geometry() {
        let template = parses_cleanly(ALARM_MENU);
        assert_eq!(
            template.options,
            vec!["configureAlarm", "startAlarm", "__NULL_LINE__", "returnMain"]
        );
    }
}
